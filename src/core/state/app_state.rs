use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::capability::LaunchFlags;
use crate::core::download::DownloadSession;
use crate::core::error::LauncherResult;
use crate::core::http::build_http_client;
use crate::core::launch::LaunchState;
use crate::core::registry::BuildRegistry;

const APP_DIR_NAME: &str = "Horizon";
const BOOTSTRAP_FILE: &str = "launcher_bootstrap.json";
const SETTINGS_FILE: &str = "launcher_settings.json";

/// User-tunable launcher behavior, persisted across restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// Bypass asset resolution and acquisition entirely on launch.
    pub skip_asset_verification: bool,
    /// Build-wide optional content (extra pak and its signature).
    pub optional_content: bool,
    /// Toggles forwarded to the game process at handoff.
    pub flags: LaunchFlags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BootstrapConfig {
    data_dir: PathBuf,
}

/// Root application context, owned by the hosting shell and shared with
/// the state machine and monitor behind `Arc<tokio::sync::Mutex<_>>`.
///
/// All process-wide mutable launcher state lives here; there are no
/// ambient globals.
pub struct LauncherContext {
    pub data_dir: PathBuf,
    pub registry: BuildRegistry,
    pub settings: LauncherSettings,
    pub http_client: Client,
    session_token: Option<String>,
    /// At most one build is downloading or running at any time.
    active_build: Option<PathBuf>,
    launch_state: LaunchState,
    /// Snapshot of the in-flight acquisition, if any.
    download_session: Option<DownloadSession>,
}

impl LauncherContext {
    pub async fn new() -> LauncherResult<Self> {
        Self::with_data_dir(default_data_dir()).await
    }

    pub async fn with_data_dir(data_dir: PathBuf) -> LauncherResult<Self> {
        if let Err(e) = tokio::fs::create_dir_all(&data_dir).await {
            warn!("Cannot create data dir {:?}: {}", data_dir, e);
        }

        let registry = BuildRegistry::load(&data_dir).await;
        let settings = load_settings_from_disk(&data_dir).unwrap_or_default();
        let http_client = build_http_client()?;

        Ok(Self {
            data_dir,
            registry,
            settings,
            http_client,
            session_token: None,
            active_build: None,
            launch_state: LaunchState::Idle,
            download_session: None,
        })
    }

    // ── Session token ───────────────────────────────────

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token.filter(|t| !t.trim().is_empty());
    }

    // ── Active build handle ─────────────────────────────

    pub fn active_build(&self) -> Option<&Path> {
        self.active_build.as_deref()
    }

    pub(crate) fn set_active_build(&mut self, path: Option<PathBuf>) {
        debug!("Active build: {:?} -> {:?}", self.active_build, path);
        self.active_build = path;
    }

    // ── Launch state ────────────────────────────────────

    pub fn launch_state(&self) -> LaunchState {
        self.launch_state
    }

    pub(crate) fn set_launch_state(&mut self, state: LaunchState) {
        if self.launch_state != state {
            debug!("Launch state: {} -> {}", self.launch_state, state);
        }
        self.launch_state = state;
    }

    // ── Download session snapshot ───────────────────────

    pub fn download_session(&self) -> Option<&DownloadSession> {
        self.download_session.as_ref()
    }

    pub(crate) fn begin_session(&mut self, session: DownloadSession) {
        // A new launch implicitly discards the previous session snapshot.
        self.download_session = Some(session);
    }

    pub(crate) fn clear_session(&mut self) {
        self.download_session = None;
    }

    // ── Settings ────────────────────────────────────────

    pub fn update_settings(&mut self, settings: LauncherSettings) {
        self.settings = settings;
        if let Err(e) = self.save_settings() {
            warn!("Cannot persist launcher settings: {}", e);
        }
    }

    pub fn save_settings(&self) -> std::io::Result<()> {
        let settings_path = self.data_dir.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(settings_path, json)
    }
}

fn load_settings_from_disk(data_dir: &Path) -> Option<LauncherSettings> {
    let path = data_dir.join(SETTINGS_FILE);
    let raw = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    let base = default_base_dir();
    let bootstrap_path = base.join(BOOTSTRAP_FILE);

    if let Ok(raw) = std::fs::read_to_string(&bootstrap_path) {
        if let Ok(cfg) = serde_json::from_str::<BootstrapConfig>(&raw) {
            if !cfg.data_dir.exists() {
                let _ = std::fs::create_dir_all(&cfg.data_dir);
            }
            return cfg.data_dir;
        }
    }

    let dir = base.join(APP_DIR_NAME);

    if !dir.exists() {
        let _ = std::fs::create_dir_all(&dir);
    }

    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn settings_round_trip_across_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut ctx = LauncherContext::with_data_dir(dir.path().to_path_buf())
                .await
                .unwrap();
            ctx.update_settings(LauncherSettings {
                skip_asset_verification: false,
                optional_content: true,
                flags: LaunchFlags {
                    dev_mode: true,
                    ..LaunchFlags::default()
                },
            });
        }

        let ctx = LauncherContext::with_data_dir(dir.path().to_path_buf())
            .await
            .unwrap();
        assert!(ctx.settings.optional_content);
        assert!(ctx.settings.flags.dev_mode);
        assert!(!ctx.settings.flags.disable_pre_edits);
    }

    #[tokio::test]
    async fn corrupt_settings_degrade_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), b"???").unwrap();

        let ctx = LauncherContext::with_data_dir(dir.path().to_path_buf())
            .await
            .unwrap();
        assert!(!ctx.settings.optional_content);
        assert!(!ctx.settings.skip_asset_verification);
    }

    #[tokio::test]
    async fn blank_session_tokens_are_treated_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = LauncherContext::with_data_dir(dir.path().to_path_buf())
            .await
            .unwrap();

        ctx.set_session_token(Some("  ".into()));
        assert_eq!(ctx.session_token(), None);

        ctx.set_session_token(Some("tok-123".into()));
        assert_eq!(ctx.session_token(), Some("tok-123"));
    }
}
