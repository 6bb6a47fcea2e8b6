use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::state::LaunchState;
use crate::core::capability::{build_root_from_executable, GameProcess};
use crate::core::state::LauncherContext;

/// Startup-only resynchronization against an externally running game.
///
/// If the application restarts while the game is still open, the handle is
/// rehydrated from the process table so the UI shows the correct build as
/// active. Nothing is resolved, downloaded or exchanged on this path.
pub struct ActiveBuildMonitor {
    context: Arc<Mutex<LauncherContext>>,
    process: Arc<dyn GameProcess>,
}

impl ActiveBuildMonitor {
    pub fn new(context: Arc<Mutex<LauncherContext>>, process: Arc<dyn GameProcess>) -> Self {
        Self { context, process }
    }

    /// Look for a running game client and adopt its build as active.
    pub async fn reconcile(&self) -> Option<PathBuf> {
        let executable = self.process.find_running().await?;
        let root = build_root_from_executable(&executable)?;

        let mut ctx = self.context.lock().await;
        ctx.set_active_build(Some(root.clone()));
        ctx.set_launch_state(LaunchState::Running);
        info!("Adopted externally running build at {:?}", root);

        Some(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capability::{LaunchFlags, GAME_EXECUTABLE_RELATIVE};
    use crate::core::error::LauncherResult;
    use async_trait::async_trait;
    use std::path::Path;

    struct FixedProcess {
        running: Option<PathBuf>,
    }

    #[async_trait]
    impl GameProcess for FixedProcess {
        async fn spawn(
            &self,
            _build_dir: &Path,
            _exchange_code: &str,
            _flags: LaunchFlags,
            _version: &str,
        ) -> LauncherResult<()> {
            panic!("reconcile must never spawn");
        }

        async fn find_running(&self) -> Option<PathBuf> {
            self.running.clone()
        }

        async fn terminate_all(&self) -> bool {
            panic!("reconcile must never terminate");
        }
    }

    async fn context() -> Arc<Mutex<LauncherContext>> {
        let dir = tempfile::tempdir().unwrap();
        let ctx = LauncherContext::with_data_dir(dir.path().to_path_buf())
            .await
            .unwrap();
        Arc::new(Mutex::new(ctx))
    }

    #[tokio::test]
    async fn adopts_the_running_build_without_launch_work() {
        let root = PathBuf::from("/builds/9.1");
        let context = context().await;
        let monitor = ActiveBuildMonitor::new(
            Arc::clone(&context),
            Arc::new(FixedProcess {
                running: Some(root.join(GAME_EXECUTABLE_RELATIVE)),
            }),
        );

        let adopted = monitor.reconcile().await;
        assert_eq!(adopted.as_deref(), Some(root.as_path()));

        let ctx = context.lock().await;
        assert_eq!(ctx.active_build(), Some(root.as_path()));
        assert_eq!(ctx.launch_state(), LaunchState::Running);
        assert!(ctx.download_session().is_none());
    }

    #[tokio::test]
    async fn no_running_process_changes_nothing() {
        let context = context().await;
        let monitor =
            ActiveBuildMonitor::new(Arc::clone(&context), Arc::new(FixedProcess { running: None }));

        assert!(monitor.reconcile().await.is_none());

        let ctx = context.lock().await;
        assert_eq!(ctx.active_build(), None);
        assert_eq!(ctx.launch_state(), LaunchState::Idle);
    }

    #[tokio::test]
    async fn foreign_executable_paths_are_ignored() {
        let context = context().await;
        let monitor = ActiveBuildMonitor::new(
            Arc::clone(&context),
            Arc::new(FixedProcess {
                running: Some(PathBuf::from("/usr/bin/unrelated.exe")),
            }),
        );

        assert!(monitor.reconcile().await.is_none());
        assert_eq!(context.lock().await.active_build(), None);
    }
}
