//! In-memory transport for tests.
//!
//! Records every outbound action in completion order, serves a fake guild
//! and message history, and can be told to fail or stall specific calls.

use async_trait::async_trait;
use parking_lot::Mutex;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use super::Transport;
use crate::error::{BotError, Result};
use crate::models::ChannelInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send {
        channel_id: ChannelId,
        content: String,
    },
    DeleteMessage {
        channel_id: ChannelId,
        message_id: MessageId,
    },
    FetchMessages {
        channel_id: ChannelId,
        limit: u8,
    },
    BulkDelete {
        channel_id: ChannelId,
        message_ids: Vec<MessageId>,
    },
    ListChannels {
        guild_id: GuildId,
    },
    DeleteChannel {
        channel_id: ChannelId,
        ok: bool,
    },
    CreateChannel {
        guild_id: GuildId,
        name: String,
        ok: bool,
    },
}

/// Tracks how many calls of one kind are running at once
#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    actions: Mutex<Vec<Action>>,
    messages: Mutex<HashMap<ChannelId, Vec<MessageId>>>,
    channels: Mutex<HashMap<GuildId, Vec<ChannelInfo>>>,
    next_id: AtomicU64,

    failing_deletes: HashSet<ChannelId>,
    failing_creates: HashSet<usize>,
    fail_channel_list: bool,
    fail_message_fetch: bool,
    fail_bulk_delete: bool,
    fail_sends: bool,

    delete_delay: Duration,
    slow_deletes: HashMap<ChannelId, Duration>,
    create_delay: Duration,

    create_calls: AtomicUsize,
    deletes_in_flight: InFlight,
    creates_in_flight: InFlight,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(10_000),
            ..Self::default()
        }
    }

    /// Seed a channel with `count` messages
    pub fn with_messages(self, channel_id: ChannelId, count: u64) -> Self {
        let ids = (1..=count).map(MessageId::new).collect();
        self.messages.lock().insert(channel_id, ids);
        self
    }

    /// Seed a guild with channels named after the given names, ids 1..=n
    pub fn with_channels(self, guild_id: GuildId, names: &[&str]) -> Self {
        let channels = names
            .iter()
            .enumerate()
            .map(|(i, name)| ChannelInfo {
                id: ChannelId::new(i as u64 + 1),
                name: name.to_string(),
                position: i as u16,
            })
            .collect();
        self.channels.lock().insert(guild_id, channels);
        self
    }

    pub fn with_raw_channels(self, guild_id: GuildId, channels: Vec<ChannelInfo>) -> Self {
        self.channels.lock().insert(guild_id, channels);
        self
    }

    pub fn failing_delete(mut self, channel_id: ChannelId) -> Self {
        self.failing_deletes.insert(channel_id);
        self
    }

    /// Make the n-th (0-based) create call fail
    pub fn failing_create(mut self, call_index: usize) -> Self {
        self.failing_creates.insert(call_index);
        self
    }

    pub fn failing_channel_list(mut self) -> Self {
        self.fail_channel_list = true;
        self
    }

    pub fn failing_message_fetch(mut self) -> Self {
        self.fail_message_fetch = true;
        self
    }

    pub fn failing_bulk_delete(mut self) -> Self {
        self.fail_bulk_delete = true;
        self
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = delay;
        self
    }

    pub fn slow_delete(mut self, channel_id: ChannelId, delay: Duration) -> Self {
        self.slow_deletes.insert(channel_id, delay);
        self
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = delay;
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }

    /// Contents of every message sent to a channel, in order
    pub fn sends_to(&self, channel_id: ChannelId) -> Vec<String> {
        self.actions
            .lock()
            .iter()
            .filter_map(|a| match a {
                Action::Send {
                    channel_id: c,
                    content,
                } if *c == channel_id => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Action) -> bool) -> usize {
        self.actions.lock().iter().filter(|a| predicate(a)).count()
    }

    pub fn channels_of(&self, guild_id: GuildId) -> Vec<ChannelInfo> {
        self.channels
            .lock()
            .get(&guild_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn max_concurrent_deletes(&self) -> usize {
        self.deletes_in_flight.max()
    }

    pub fn max_concurrent_creates(&self) -> usize {
        self.creates_in_flight.max()
    }

    fn record(&self, action: Action) {
        self.actions.lock().push(action);
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

fn injected(what: &str) -> BotError {
    BotError::Discord {
        message: format!("injected failure: {}", what),
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<MessageId> {
        self.record(Action::Send {
            channel_id,
            content: content.to_string(),
        });
        if self.fail_sends {
            return Err(injected("send"));
        }
        Ok(MessageId::new(self.next_id()))
    }

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        self.record(Action::DeleteMessage {
            channel_id,
            message_id,
        });
        Ok(())
    }

    async fn recent_messages(&self, channel_id: ChannelId, limit: u8) -> Result<Vec<MessageId>> {
        self.record(Action::FetchMessages { channel_id, limit });
        if self.fail_message_fetch {
            return Err(injected("fetch messages"));
        }
        let messages = self.messages.lock();
        let history = messages.get(&channel_id).cloned().unwrap_or_default();
        // Newest first, like the real endpoint
        Ok(history.into_iter().rev().take(limit as usize).collect())
    }

    async fn bulk_delete_messages(
        &self,
        channel_id: ChannelId,
        message_ids: &[MessageId],
    ) -> Result<()> {
        self.record(Action::BulkDelete {
            channel_id,
            message_ids: message_ids.to_vec(),
        });
        if self.fail_bulk_delete {
            return Err(injected("bulk delete"));
        }
        if let Some(history) = self.messages.lock().get_mut(&channel_id) {
            history.retain(|id| !message_ids.contains(id));
        }
        Ok(())
    }

    async fn guild_channels(&self, guild_id: GuildId) -> Result<Vec<ChannelInfo>> {
        self.record(Action::ListChannels { guild_id });
        if self.fail_channel_list {
            return Err(injected("list channels"));
        }
        Ok(self.channels_of(guild_id))
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<()> {
        self.deletes_in_flight.enter();
        let delay = self
            .slow_deletes
            .get(&channel_id)
            .copied()
            .unwrap_or(self.delete_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.deletes_in_flight.exit();

        let ok = !self.failing_deletes.contains(&channel_id);
        self.record(Action::DeleteChannel { channel_id, ok });
        if !ok {
            return Err(injected("delete channel"));
        }
        for channels in self.channels.lock().values_mut() {
            channels.retain(|c| c.id != channel_id);
        }
        Ok(())
    }

    async fn create_text_channel(&self, guild_id: GuildId, name: &str) -> Result<ChannelInfo> {
        let call_index = self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.creates_in_flight.enter();
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }
        self.creates_in_flight.exit();

        let ok = !self.failing_creates.contains(&call_index);
        self.record(Action::CreateChannel {
            guild_id,
            name: name.to_string(),
            ok,
        });
        if !ok {
            return Err(injected("create channel"));
        }

        let mut channels = self.channels.lock();
        let guild_channels = channels.entry(guild_id).or_default();
        let channel = ChannelInfo {
            id: ChannelId::new(self.next_id()),
            name: name.to_string(),
            position: guild_channels.len() as u16,
        };
        guild_channels.push(channel.clone());
        Ok(channel)
    }
}
