// ─── Capabilities ───
// Host-facing seams consumed by the orchestrator core. The hosting shell
// constructs the implementations and injects them; the core never reaches
// for OS or network primitives directly.

pub mod notify;
pub mod process;
pub mod store;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::LauncherResult;

pub use notify::LogNotifier;
pub use process::{
    build_root_from_executable, game_executable_path, NativeGameProcess, GAME_EXECUTABLE_RELATIVE,
};
pub use store::HttpAssetStore;

/// Byte-level progress callback: `(bytes_transferred, total_bytes)`.
pub type ProgressFn = dyn Fn(u64, Option<u64>) + Send + Sync;

/// Local asset storage plus the transfer primitive that fills it.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Probe for a file, optionally requiring an exact byte size.
    async fn exists(&self, path: &Path, expected_size: Option<u64>) -> bool;

    /// Fetch `url` into `dest`, creating parent directories as needed.
    async fn fetch(&self, url: &str, dest: &Path, on_progress: &ProgressFn) -> LauncherResult<()>;

    /// Delete a file. Deleting a file that is already gone is not an error.
    async fn delete(&self, path: &Path) -> LauncherResult<()>;
}

/// Per-launch toggles forwarded verbatim to the game process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LaunchFlags {
    pub dev_mode: bool,
    pub edit_on_release: bool,
    pub disable_pre_edits: bool,
}

/// Spawn, enumerate and terminate the external game process.
#[async_trait]
pub trait GameProcess: Send + Sync {
    /// Hand off to the game client with a single-use exchange code.
    async fn spawn(
        &self,
        build_dir: &Path,
        exchange_code: &str,
        flags: LaunchFlags,
        version: &str,
    ) -> LauncherResult<()>;

    /// Path of an already-running game client executable, if any.
    async fn find_running(&self) -> Option<PathBuf>;

    /// Terminate every tracked game process. `true` on confirmed success.
    async fn terminate_all(&self) -> bool;
}

/// Fire-and-forget user-visible message.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}
