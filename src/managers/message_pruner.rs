use poise::serenity_prelude::ChannelId;
use tracing::{error, info};

use crate::error::Result;
use crate::messages;
use crate::models::BulkOperationResult;
use crate::transport::{notify, SharedTransport};

/// Maximum number of messages fetched and deleted by one `!clean`
///
/// Only the most recent page is touched; older history is left alone.
pub const PRUNE_PAGE_SIZE: u8 = 100;

/// Deletes the most recent page of messages in a channel
pub struct MessagePruner {
    transport: SharedTransport,
}

impl MessagePruner {
    pub fn new(transport: SharedTransport) -> Self {
        Self { transport }
    }

    /// Fetch one page of recent messages and remove them with a single bulk delete
    pub async fn prune(&self, channel_id: ChannelId) -> Result<BulkOperationResult> {
        let message_ids = match self
            .transport
            .recent_messages(channel_id, PRUNE_PAGE_SIZE)
            .await
        {
            Ok(ids) => ids,
            Err(e) => {
                error!("Failed to fetch messages in channel {}: {}", channel_id, e);
                notify(
                    self.transport.as_ref(),
                    channel_id,
                    messages::MESSAGES_FETCH_FAILED,
                )
                .await;
                return Err(e);
            }
        };

        if message_ids.is_empty() {
            notify(
                self.transport.as_ref(),
                channel_id,
                messages::NOTHING_TO_DELETE,
            )
            .await;
            return Ok(BulkOperationResult::new(0));
        }

        let mut result = BulkOperationResult::new(message_ids.len());
        match self
            .transport
            .bulk_delete_messages(channel_id, &message_ids)
            .await
        {
            Ok(()) => {
                result.succeeded = message_ids.len();
                info!(
                    "Deleted {} messages in channel {}",
                    message_ids.len(),
                    channel_id
                );
                notify(
                    self.transport.as_ref(),
                    channel_id,
                    messages::MESSAGES_DELETED,
                )
                .await;
            }
            Err(e) => {
                error!(
                    "Failed to bulk delete {} messages in channel {}: {}",
                    message_ids.len(),
                    channel_id,
                    e
                );
                let reason = e.to_string();
                for id in &message_ids {
                    result.record_failure(id.to_string(), reason.clone());
                }
            }
        }

        Ok(result)
    }
}
