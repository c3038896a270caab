use poise::serenity_prelude::{ChannelId, GuildId};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::messages;
use crate::models::{BulkOperationResult, ChannelInfo};
use crate::transport::{notify, SharedTransport};

/// Wipes and recreates guild channels
///
/// Deletion fans out one task per channel and joins on all of them.
/// Creation is strictly sequential.
pub struct ChannelMutator {
    transport: SharedTransport,

    /// Upper bound on concurrent deletions. `None` issues every delete at
    /// once, which a large guild may hit remote rate limits with.
    max_concurrent_deletes: Option<usize>,
}

impl ChannelMutator {
    pub fn new(transport: SharedTransport, max_concurrent_deletes: Option<usize>) -> Self {
        Self {
            transport,
            max_concurrent_deletes,
        }
    }

    /// Delete every channel in the guild and send one completion notice
    ///
    /// Returns an error only when the channel list cannot be fetched, in which
    /// case nothing is deleted. Individual deletion failures are logged and
    /// tallied, never propagated.
    pub async fn delete_all(
        &self,
        guild_id: GuildId,
        notify_channel: ChannelId,
    ) -> Result<BulkOperationResult> {
        let channels = match self.transport.guild_channels(guild_id).await {
            Ok(channels) => channels,
            Err(e) => {
                error!("Failed to fetch channels for guild {}: {}", guild_id, e);
                notify(
                    self.transport.as_ref(),
                    notify_channel,
                    messages::CHANNELS_FETCH_FAILED,
                )
                .await;
                return Err(e);
            }
        };

        info!(
            "Deleting {} channels in guild {} (concurrency limit: {})",
            channels.len(),
            guild_id,
            self.max_concurrent_deletes
                .map(|n| n.to_string())
                .unwrap_or_else(|| "none".to_string())
        );

        let limiter = self
            .max_concurrent_deletes
            .map(|n| Arc::new(Semaphore::new(n.clamp(1, Semaphore::MAX_PERMITS))));

        let mut result = BulkOperationResult::new(channels.len());
        let mut tasks = JoinSet::new();

        for channel in channels {
            let transport = Arc::clone(&self.transport);
            let limiter = limiter.clone();
            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };
                let outcome = transport.delete_channel(channel.id).await;
                (channel, outcome)
            });
        }

        // Barrier: every task is awaited, failed or not
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((channel, Ok(()))) => {
                    debug!("Deleted channel {} ({})", channel.name, channel.id);
                    result.record_success();
                }
                Ok((channel, Err(e))) => {
                    error!("Failed to delete channel {}: {}", channel.id, e);
                    result.record_failure(channel.id.to_string(), e.to_string());
                }
                Err(e) => {
                    error!("Channel deletion task did not complete: {}", e);
                    result.record_failure("unknown", e.to_string());
                }
            }
        }

        if result.is_complete_success() {
            info!(
                "Deleted all {} channels in guild {}",
                result.attempted, guild_id
            );
        } else {
            warn!(
                "Deleted {} of {} channels in guild {}, {} failed",
                result.succeeded,
                result.attempted,
                guild_id,
                result.failed_count()
            );
        }

        notify(
            self.transport.as_ref(),
            notify_channel,
            &messages::channels_deleted(&result),
        )
        .await;

        Ok(result)
    }

    /// Create a single text channel, optionally posting a first message in it
    ///
    /// A failed seed message is logged; the channel is still returned. The
    /// seed is the configured text only; no guild icon is looked up. Callers
    /// still create one channel at a time against a guild.
    pub async fn create_one(
        &self,
        guild_id: GuildId,
        name: &str,
        seed_message: Option<&str>,
    ) -> Result<ChannelInfo> {
        let channel = self.transport.create_text_channel(guild_id, name).await?;
        debug!("Created channel {} ({})", channel.name, channel.id);

        if let Some(seed) = seed_message {
            if let Err(e) = self.transport.send_message(channel.id, seed).await {
                error!("Failed to seed channel {}: {}", channel.id, e);
            }
        }

        Ok(channel)
    }

    /// Create `count` channels one after another, never overlapping
    pub async fn create_many(
        &self,
        guild_id: GuildId,
        name: &str,
        seed_message: Option<&str>,
        count: usize,
    ) -> BulkOperationResult {
        let mut result = BulkOperationResult::new(count);

        for attempt in 0..count {
            match self.create_one(guild_id, name, seed_message).await {
                Ok(_) => result.record_success(),
                Err(e) => {
                    error!(
                        "Failed to create channel {}/{} in guild {}: {}",
                        attempt + 1,
                        count,
                        guild_id,
                        e
                    );
                    result.record_failure(format!("#{}", attempt + 1), e.to_string());
                }
            }
        }

        info!(
            "Created {} of {} channels in guild {}",
            result.succeeded, count, guild_id
        );
        result
    }
}
