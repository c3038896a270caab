// src/messages.rs
use crate::models::{BulkOperationResult, ChannelInfo};

pub const PONG: &str = "Pong!";
pub const NO_PERMISSION: &str = "You do not have permission to use this bot.";
pub const NOTHING_TO_DELETE: &str = "There are no messages to delete.";
pub const MESSAGES_DELETED: &str = "Messages deleted successfully!";
pub const MESSAGES_FETCH_FAILED: &str = "There was an error fetching the messages.";
pub const CHANNELS_FETCH_FAILED: &str = "There was an error fetching the channels.";
pub const ALL_CHANNELS_DELETED: &str = "All channels have been deleted.";
pub const GUILD_ONLY: &str = "This command can only be used in a server.";

/// One line per channel under a header
pub fn channel_list(channels: &[ChannelInfo]) -> String {
    let mut output = String::from("Channels:\n");
    for channel in channels {
        output.push_str(&channel.name);
        output.push('\n');
    }
    output
}

/// Completion notice for a channel wipe
pub fn channels_deleted(result: &BulkOperationResult) -> String {
    if result.failed.is_empty() {
        ALL_CHANNELS_DELETED.to_string()
    } else {
        format!(
            "Channel deletion finished: {} of {} deleted, {} failed.",
            result.succeeded,
            result.attempted,
            result.failed_count()
        )
    }
}
