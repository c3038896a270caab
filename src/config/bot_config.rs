use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::error::{BotError, Result};

const DEFAULT_RAID_CHANNEL_NAME: &str = "Lorem Ipsum";

/// Bot configuration - who may issue commands and what `!raid` seeds
/// Loaded once from info.json at startup and never reloaded
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Identities allowed to issue commands (exact match, no normalization)
    pub permissions: Vec<String>,

    /// Message posted as the first message of every channel created by `!raid`
    #[serde(alias = "MessageRaid")]
    pub raid_message: String,

    /// Identity that is always authorized, independent of `permissions`
    #[serde(default)]
    pub owner_id: Option<String>,

    /// Name given to channels created by `!raid`
    #[serde(default = "default_raid_channel_name")]
    pub raid_channel_name: String,

    /// Cap on concurrent channel deletions; unbounded when absent
    #[serde(default)]
    pub channel_delete_concurrency: Option<usize>,
}

fn default_raid_channel_name() -> String {
    DEFAULT_RAID_CHANNEL_NAME.to_string()
}

impl BotConfig {
    /// Load and validate from a JSON file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BotError::ConfigLoad {
            path: path.to_string(),
            source: e,
        })?;

        let config = Self::from_json(&content).map_err(|e| match e {
            BotError::ConfigParse { source, .. } => BotError::ConfigParse {
                path: path.to_string(),
                source,
            },
            other => other,
        })?;

        info!(
            "Loaded config from {}: {} authorized identities",
            path,
            config.permissions.len()
        );
        Ok(config)
    }

    /// Parse and validate from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).map_err(|e| BotError::ConfigParse {
            path: "<inline>".to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.raid_message.trim().is_empty() {
            return Err(BotError::ConfigValidation {
                message: "raidMessage must not be empty".to_string(),
            });
        }

        if self.raid_channel_name.trim().is_empty() {
            return Err(BotError::ConfigValidation {
                message: "raidChannelName must not be empty".to_string(),
            });
        }

        if let Some(index) = self.permissions.iter().position(|id| id.is_empty()) {
            return Err(BotError::ConfigValidation {
                message: format!("permissions[{}] is an empty identity", index),
            });
        }

        if matches!(self.owner_id.as_deref(), Some("")) {
            return Err(BotError::ConfigValidation {
                message: "ownerId must not be empty when present".to_string(),
            });
        }

        if self.channel_delete_concurrency == Some(0) {
            return Err(BotError::ConfigValidation {
                message: "channelDeleteConcurrency must be at least 1".to_string(),
            });
        }

        if let Some(limit) = self.channel_delete_concurrency {
            if limit > Semaphore::MAX_PERMITS {
                return Err(BotError::ConfigValidation {
                    message: format!(
                        "channelDeleteConcurrency must be at most {}",
                        Semaphore::MAX_PERMITS
                    ),
                });
            }
        }

        if self.permissions.is_empty() && self.owner_id.is_none() {
            warn!("No authorized identities configured; every command will be rejected");
        }

        Ok(())
    }
}
