pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::auth::{AuthExchange, ExchangeCode, HttpAuthExchange};
pub use crate::core::capability::{
    AssetStore, GameProcess, HttpAssetStore, LaunchFlags, LogNotifier, NativeGameProcess, Notifier,
};
pub use crate::core::catalog::{BuildCatalog, BuildManifest};
pub use crate::core::download::{DownloadEvent, DownloadOrchestrator, DownloadSession};
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::launch::{ActiveBuildMonitor, LaunchOutcome, LaunchState, LaunchStateMachine};
pub use crate::core::registry::{Build, BuildRegistry, InstallKind};
pub use crate::core::state::{LauncherContext, LauncherSettings};

/// Initialize structured logging for the hosting shell.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,horizon_lib=debug")),
        )
        .init();

    tracing::info!("Horizon launcher core starting...");
}
