use base64::Engine;

use crate::error::{BotError, Result};

pub const TOKEN_ENV_VAR: &str = "DISCORD_TOKEN";

/// Read the bot token from the environment
pub fn discord_token() -> Result<String> {
    require_token(std::env::var(TOKEN_ENV_VAR).ok())
}

fn require_token(value: Option<String>) -> Result<String> {
    match value {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(BotError::MissingCredential {
            name: TOKEN_ENV_VAR.to_string(),
        }),
    }
}

/// Extract the bot/application ID from a token
///
/// The first segment of a Discord token is the bot ID, base64 encoded
/// without padding. Tokens in the wild use both the standard and the
/// URL-safe alphabet.
pub fn bot_id_from_token(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;

    let decoded = base64::engine::general_purpose::STANDARD_NO_PAD
        .decode(segment)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(segment))
        .ok()?;

    let id = String::from_utf8(decoded).ok()?;
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Some(id)
    } else {
        None
    }
}
