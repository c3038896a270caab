/// Commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Clean,
    Channels,
    Raid,
    CleanChannels,
}

/// Exact, case-sensitive message content for each command
///
/// Entries must stay mutually exclusive; lookup is first match.
pub const COMMAND_TABLE: &[(&str, Command)] = &[
    ("!ping", Command::Ping),
    ("!clean", Command::Clean),
    ("!channels", Command::Channels),
    ("!raid", Command::Raid),
    ("!clean channels", Command::CleanChannels),
];

impl Command {
    /// Look up message content in the command table
    pub fn parse(content: &str) -> Option<Self> {
        COMMAND_TABLE
            .iter()
            .find(|(trigger, _)| *trigger == content)
            .map(|(_, command)| *command)
    }

    pub fn trigger(self) -> &'static str {
        COMMAND_TABLE
            .iter()
            .find(|(_, command)| *command == self)
            .map(|(trigger, _)| *trigger)
            .unwrap_or("?")
    }

    /// Whether the command needs a guild to act on
    pub fn guild_only(self) -> bool {
        matches!(
            self,
            Command::Channels | Command::Raid | Command::CleanChannels
        )
    }
}
