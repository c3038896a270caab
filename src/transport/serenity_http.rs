use async_trait::async_trait;
use poise::serenity_prelude::{
    self as serenity, ChannelId, GetMessages, GuildId, Http, MessageId,
};
use std::sync::Arc;
use tracing::debug;

use super::Transport;
use crate::error::Result;
use crate::models::ChannelInfo;

/// Transport backed by serenity's REST client
pub struct SerenityTransport {
    http: Arc<Http>,
}

impl SerenityTransport {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for SerenityTransport {
    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<MessageId> {
        let http: &Http = &self.http;
        let message = channel_id.say(http, content).await?;
        Ok(message.id)
    }

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        let http: &Http = &self.http;
        channel_id.delete_message(http, message_id).await?;
        Ok(())
    }

    async fn recent_messages(&self, channel_id: ChannelId, limit: u8) -> Result<Vec<MessageId>> {
        let http: &Http = &self.http;
        let messages = channel_id
            .messages(http, GetMessages::new().limit(limit))
            .await?;
        debug!("Fetched {} messages from {}", messages.len(), channel_id);
        Ok(messages.iter().map(|m| m.id).collect())
    }

    async fn bulk_delete_messages(
        &self,
        channel_id: ChannelId,
        message_ids: &[MessageId],
    ) -> Result<()> {
        let http: &Http = &self.http;
        channel_id
            .delete_messages(http, message_ids.iter().copied())
            .await?;
        Ok(())
    }

    async fn guild_channels(&self, guild_id: GuildId) -> Result<Vec<ChannelInfo>> {
        let http: &Http = &self.http;
        let channels = guild_id.channels(http).await?;
        Ok(channels.values().map(ChannelInfo::from).collect())
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<()> {
        let http: &Http = &self.http;
        channel_id.delete(http).await?;
        Ok(())
    }

    async fn create_text_channel(&self, guild_id: GuildId, name: &str) -> Result<ChannelInfo> {
        let http: &Http = &self.http;
        let channel = guild_id
            .create_channel(
                http,
                serenity::CreateChannel::new(name).kind(serenity::ChannelType::Text),
            )
            .await?;
        Ok(ChannelInfo::from(&channel))
    }
}
