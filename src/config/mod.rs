pub mod bot_config;
pub mod credentials;

pub use bot_config::BotConfig;
pub use credentials::{bot_id_from_token, discord_token};
