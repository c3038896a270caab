// src/models.rs
use poise::serenity_prelude as serenity;

/// Opaque author identifier, compared by exact equality
pub type Identity = String;

/// A single inbound chat message, as seen by the dispatcher
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub author: Identity,
    pub content: String,
    pub channel_id: serenity::ChannelId,
    pub guild_id: Option<serenity::GuildId>,
    pub message_id: serenity::MessageId,
}

impl InboundMessage {
    pub fn from_serenity(msg: &serenity::Message) -> Self {
        Self {
            author: msg.author.id.to_string(),
            content: msg.content.clone(),
            channel_id: msg.channel_id,
            guild_id: msg.guild_id,
            message_id: msg.id,
        }
    }
}

/// A guild channel as far as the engine cares about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: serenity::ChannelId,
    pub name: String,
    pub position: u16,
}

impl From<&serenity::GuildChannel> for ChannelInfo {
    fn from(channel: &serenity::GuildChannel) -> Self {
        Self {
            id: channel.id,
            name: channel.name.clone(),
            position: channel.position,
        }
    }
}

/// Tally of a bulk operation over a set of resources
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkOperationResult {
    pub attempted: usize,
    pub succeeded: usize,
    /// (resource id, reason)
    pub failed: Vec<(String, String)>,
}

impl BulkOperationResult {
    pub fn new(attempted: usize) -> Self {
        Self {
            attempted,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, resource: impl Into<String>, reason: impl Into<String>) {
        self.failed.push((resource.into(), reason.into()));
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.succeeded == self.attempted
    }
}
