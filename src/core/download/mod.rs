pub mod orchestrator;
pub mod session;

pub use orchestrator::DownloadOrchestrator;
pub use session::{format_eta, DownloadEvent, DownloadSession};
