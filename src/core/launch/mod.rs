pub mod machine;
pub mod monitor;
pub mod state;

pub use machine::{LaunchOutcome, LaunchStateMachine};
pub use monitor::ActiveBuildMonitor;
pub use state::LaunchState;
