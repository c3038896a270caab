pub mod channel_mutator;
pub mod message_pruner;

pub use channel_mutator::ChannelMutator;
pub use message_pruner::MessagePruner;
