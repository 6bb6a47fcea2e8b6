// ─── Launch State Machine ───
// Sequences a launch attempt end to end: exclusivity check, token and
// executable gates, asset acquisition, code exchange, process handoff.
// Every failed step surfaces a notification and drops back to Idle.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tracing::{info, warn};

use super::state::LaunchState;
use crate::core::auth::AuthExchange;
use crate::core::capability::{AssetStore, GameProcess, Notifier};
use crate::core::download::{DownloadEvent, DownloadOrchestrator, DownloadSession};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::registry::Build;
use crate::core::resolver;
use crate::core::state::LauncherContext;

const NOTIFY_TITLE: &str = "Horizon";

/// How a `launch` call concluded when it did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Handoff succeeded; the build is now the active one.
    Started,
    /// The requested build is already downloading or running. No new
    /// session was created; the caller presents its close affordance.
    AlreadyActive,
}

pub struct LaunchStateMachine {
    context: Arc<Mutex<LauncherContext>>,
    store: Arc<dyn AssetStore>,
    exchange: Arc<dyn AuthExchange>,
    process: Arc<dyn GameProcess>,
    notifier: Arc<dyn Notifier>,
    events: Option<mpsc::UnboundedSender<DownloadEvent>>,
    snapshots: Option<watch::Sender<DownloadSession>>,
}

impl LaunchStateMachine {
    pub fn new(
        context: Arc<Mutex<LauncherContext>>,
        store: Arc<dyn AssetStore>,
        exchange: Arc<dyn AuthExchange>,
        process: Arc<dyn GameProcess>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            context,
            store,
            exchange,
            process,
            notifier,
            events: None,
            snapshots: None,
        }
    }

    /// Forward acquisition events to the hosting shell.
    pub fn with_download_events(mut self, tx: mpsc::UnboundedSender<DownloadEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Publish full session snapshots as assets settle.
    pub fn with_session_snapshots(mut self, tx: watch::Sender<DownloadSession>) -> Self {
        self.snapshots = Some(tx);
        self
    }

    /// Run one launch attempt for `build`.
    ///
    /// Acquisition work that completed before a later step failed is kept;
    /// the user re-triggers the launch and the size probe skips it.
    pub async fn launch(&self, build: &Build) -> LauncherResult<LaunchOutcome> {
        let (token, settings) = {
            let ctx = self.context.lock().await;
            if ctx.active_build() == Some(build.path.as_path()) {
                info!("Build at {:?} is already active; not relaunching", build.path);
                return Ok(LaunchOutcome::AlreadyActive);
            }
            (
                ctx.session_token().map(str::to_owned),
                ctx.settings.clone(),
            )
        };
        // Lock released: between the check above and the handle being set
        // below, a concurrent launch of a *different* path can also pass.

        let Some(token) = token else {
            self.notifier.notify(NOTIFY_TITLE, "You are not authenticated!");
            return Err(LauncherError::Authentication("no session token".into()));
        };

        let executable = build.executable_path();
        if !self.store.exists(&executable, None).await {
            self.notifier.notify(NOTIFY_TITLE, "Game does not exist!");
            return Err(LauncherError::AssetIntegrity(format!(
                "game client missing at {executable:?}"
            )));
        }

        if !settings.skip_asset_verification {
            let mut assets = resolver::resolve(&build.version);

            if !assets.is_empty() {
                if settings.optional_content {
                    assets.extend(resolver::optional_content_assets());
                } else {
                    // Flag is off: sweep stale optional paks before acquiring.
                    for path in resolver::optional_content_paths(&build.path) {
                        if let Err(e) = self.store.delete(&path).await {
                            warn!("Could not delete optional content {:?}: {}", path, e);
                        }
                    }
                }

                {
                    let mut ctx = self.context.lock().await;
                    ctx.set_active_build(Some(build.path.clone()));
                    ctx.set_launch_state(LaunchState::Acquiring);
                    ctx.begin_session(DownloadSession::new(&assets));
                }

                let mut orchestrator = DownloadOrchestrator::new(Arc::clone(&self.store));
                if let Some(events) = &self.events {
                    orchestrator = orchestrator.with_events(events.clone());
                }
                if let Some(snapshots) = &self.snapshots {
                    orchestrator = orchestrator.with_snapshots(snapshots.clone());
                }

                // Runs to completion regardless of individual asset errors.
                let session = orchestrator.run(&build.path, &assets).await;
                info!(
                    "Acquisition session {} settled {}/{} assets",
                    session.id,
                    session.completed.len(),
                    session.files.len()
                );

                self.context.lock().await.clear_session();
            }
        }

        self.transition(LaunchState::Authenticating).await;
        let code = match self.exchange.exchange(&token).await {
            Ok(code) => code,
            Err(e) => {
                self.notifier
                    .notify(NOTIFY_TITLE, "Failed to authenticate with Horizon!");
                self.reset_after_failure(&build.path).await;
                return Err(match e {
                    LauncherError::Authentication(_) => e,
                    other => LauncherError::Authentication(other.to_string()),
                });
            }
        };

        self.notifier.notify(
            &format!("Starting {}", build.version),
            "This may take a while, please wait while the game loads!",
        );

        self.transition(LaunchState::Launching).await;
        match self
            .process
            .spawn(&build.path, &code.code, settings.flags, &build.version)
            .await
        {
            Ok(()) => {
                let mut ctx = self.context.lock().await;
                ctx.set_active_build(Some(build.path.clone()));
                ctx.set_launch_state(LaunchState::Running);
                info!("Build {} running from {:?}", build.version, build.path);
                Ok(LaunchOutcome::Started)
            }
            Err(e) => {
                self.reset_after_failure(&build.path).await;
                Err(e)
            }
        }
    }

    /// Terminate the running game. Clears the active handle only on
    /// confirmed success; on failure the build keeps running and the
    /// error is surfaced. The confirmation dialog is the caller's job.
    pub async fn close(&self) -> LauncherResult<()> {
        self.transition(LaunchState::Closing).await;

        if self.process.terminate_all().await {
            let mut ctx = self.context.lock().await;
            ctx.set_active_build(None);
            ctx.set_launch_state(LaunchState::Idle);
            info!("Game processes terminated");
            Ok(())
        } else {
            self.transition(LaunchState::Running).await;
            Err(LauncherError::ProcessLaunch(
                "could not terminate game processes".into(),
            ))
        }
    }

    async fn transition(&self, to: LaunchState) {
        self.context.lock().await.set_launch_state(to);
    }

    /// A failed start never leaves a half-claimed handle behind.
    async fn reset_after_failure(&self, build_path: &Path) {
        let mut ctx = self.context.lock().await;
        if ctx.active_build() == Some(build_path) {
            ctx.set_active_build(None);
        }
        ctx.clear_session();
        ctx.set_launch_state(LaunchState::Idle);
    }
}
