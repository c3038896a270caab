pub mod dispatcher;
pub mod table;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use table::Command;
