pub mod gate;

pub use gate::{is_command, PermissionGate};
