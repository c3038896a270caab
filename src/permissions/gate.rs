// src/permissions/gate.rs
use std::collections::HashSet;

use crate::config::BotConfig;

/// Messages starting with this character are commands and go through the gate
pub const COMMAND_PREFIX: char = '!';

/// Static allow-list of identities that may issue commands
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    allowed: HashSet<String>,
}

impl PermissionGate {
    pub fn new<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: identities.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from config: the permission list plus the optional owner identity
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            config
                .permissions
                .iter()
                .chain(config.owner_id.iter())
                .cloned(),
        )
    }

    /// Exact-match membership test; no case or whitespace folding
    pub fn is_authorized(&self, identity: &str) -> bool {
        self.allowed.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// Whether the message content is a command that must pass the gate
pub fn is_command(content: &str) -> bool {
    content.starts_with(COMMAND_PREFIX)
}
