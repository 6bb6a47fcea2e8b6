use serde::Serialize;

/// Lifecycle of the active build, driven by the state machine.
///
/// `Idle → Acquiring → Authenticating → Launching → Running → Closing → Idle`;
/// any failed step drops straight back to `Idle`. Launches that need no
/// acquisition skip `Acquiring`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LaunchState {
    Idle,
    Acquiring,
    Authenticating,
    Launching,
    Running,
    Closing,
}

impl std::fmt::Display for LaunchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchState::Idle => write!(f, "idle"),
            LaunchState::Acquiring => write!(f, "acquiring"),
            LaunchState::Authenticating => write!(f, "authenticating"),
            LaunchState::Launching => write!(f, "launching"),
            LaunchState::Running => write!(f, "running"),
            LaunchState::Closing => write!(f, "closing"),
        }
    }
}
