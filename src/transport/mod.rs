//! Outbound boundary of the bot.
//!
//! Everything the engine does to the remote guild goes through [`Transport`],
//! so the command logic can run against serenity's HTTP client in production
//! and against an in-memory recorder in tests.

pub mod serenity_http;

#[cfg(test)]
pub mod recording;

use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId};
use std::sync::Arc;

use crate::error::Result;
use crate::models::ChannelInfo;

pub use serenity_http::SerenityTransport;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a text message to a channel
    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<MessageId>;

    /// Delete a single message
    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()>;

    /// Fetch up to `limit` of the most recent message ids in a channel
    async fn recent_messages(&self, channel_id: ChannelId, limit: u8) -> Result<Vec<MessageId>>;

    /// Delete a list of messages in one request
    async fn bulk_delete_messages(
        &self,
        channel_id: ChannelId,
        message_ids: &[MessageId],
    ) -> Result<()>;

    /// List every channel of a guild
    async fn guild_channels(&self, guild_id: GuildId) -> Result<Vec<ChannelInfo>>;

    /// Delete a channel
    async fn delete_channel(&self, channel_id: ChannelId) -> Result<()>;

    /// Create a text channel
    async fn create_text_channel(&self, guild_id: GuildId, name: &str) -> Result<ChannelInfo>;
}

/// Shared transport type
pub type SharedTransport = Arc<dyn Transport>;

/// Send a user-facing notice, logging instead of propagating failures
pub async fn notify(transport: &dyn Transport, channel_id: ChannelId, content: &str) {
    if let Err(e) = transport.send_message(channel_id, content).await {
        tracing::error!("Failed to send message to channel {}: {}", channel_id, e);
    }
}
