// ─── Game Process ───
// Spawns the game client with an exchange-code handoff and tracks the
// running client through the system process table.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use sysinfo::System;
use tracing::{debug, info, warn};

use super::{GameProcess, LaunchFlags};
use crate::core::error::{LauncherError, LauncherResult};

/// Game client executable, relative to a build's install root.
pub const GAME_EXECUTABLE_RELATIVE: &str =
    "HorizonGame/Binaries/Win64/HorizonClient-Win64-Shipping.exe";

/// Process name the monitor looks for.
pub const GAME_PROCESS_NAME: &str = "HorizonClient-Win64-Shipping.exe";

/// Everything `terminate_all` is allowed to kill: the client itself plus
/// its anticheat and helper siblings.
const RELATED_PROCESS_NAMES: &[&str] = &[
    "HorizonClient-Win64-Shipping.exe",
    "HorizonClient-Win64-Shipping_EAC.exe",
    "HorizonClient-Win64-Shipping_BE.exe",
    "HorizonLauncher.exe",
];

/// Absolute path of the game client inside `build_dir`.
pub fn game_executable_path(build_dir: &Path) -> PathBuf {
    build_dir.join(GAME_EXECUTABLE_RELATIVE)
}

/// Recover a build's install root from its running executable path.
pub fn build_root_from_executable(exe: &Path) -> Option<PathBuf> {
    let suffix = Path::new(GAME_EXECUTABLE_RELATIVE);
    if !exe.ends_with(suffix) {
        return None;
    }

    let mut root = exe.to_path_buf();
    for _ in suffix.components() {
        root.pop();
    }
    Some(root)
}

/// Production process capability backed by `std::process` and `sysinfo`.
pub struct NativeGameProcess;

#[async_trait]
impl GameProcess for NativeGameProcess {
    async fn spawn(
        &self,
        build_dir: &Path,
        exchange_code: &str,
        flags: LaunchFlags,
        version: &str,
    ) -> LauncherResult<()> {
        let executable = game_executable_path(build_dir);

        let mut cmd = std::process::Command::new(&executable);
        cmd.arg("-AUTH_LOGIN=unused");
        cmd.arg(format!("-AUTH_PASSWORD={exchange_code}"));
        cmd.arg("-AUTH_TYPE=exchangecode");
        cmd.arg(format!("-buildversion={version}"));

        if flags.dev_mode {
            cmd.arg("-dev");
        }
        if flags.edit_on_release {
            cmd.arg("-EnableEditOnRelease");
        }
        if flags.disable_pre_edits {
            cmd.arg("-DisablePreEdits");
        }

        cmd.current_dir(build_dir);
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        debug!("Spawning game client: {:?}", cmd);

        // The client runs detached; lifecycle tracking goes through the
        // process table, not this child handle.
        cmd.spawn()
            .map_err(|e| LauncherError::ProcessLaunch(e.to_string()))?;

        info!("Game client started for build at {:?}", build_dir);
        Ok(())
    }

    async fn find_running(&self) -> Option<PathBuf> {
        tokio::task::spawn_blocking(|| {
            let mut system = System::new_all();
            system.refresh_all();
            system
                .processes()
                .values()
                .find(|p| p.name().to_string_lossy() == GAME_PROCESS_NAME)
                .and_then(|p| p.exe().map(Path::to_path_buf))
        })
        .await
        .ok()
        .flatten()
    }

    async fn terminate_all(&self) -> bool {
        tokio::task::spawn_blocking(|| {
            let mut system = System::new_all();
            system.refresh_all();
            let mut all_killed = true;

            for process in system.processes().values() {
                let name = process.name().to_string_lossy();
                if RELATED_PROCESS_NAMES.iter().any(|known| *known == name) {
                    if process.kill() {
                        info!("Terminated {} (pid {})", name, process.pid());
                    } else {
                        warn!("Could not terminate {} (pid {})", name, process.pid());
                        all_killed = false;
                    }
                }
            }

            all_killed
        })
        .await
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_root_strips_executable_suffix() {
        let exe = Path::new("C:/Games/9.1/HorizonGame/Binaries/Win64/HorizonClient-Win64-Shipping.exe");
        let root = build_root_from_executable(exe).unwrap();
        assert_eq!(root, Path::new("C:/Games/9.1"));
    }

    #[test]
    fn build_root_rejects_foreign_executables() {
        assert!(build_root_from_executable(Path::new("/usr/bin/other.exe")).is_none());
        assert!(build_root_from_executable(Path::new("HorizonClient-Win64-Shipping.exe")).is_none());
    }

    #[test]
    fn executable_path_is_rooted_at_build_dir() {
        let path = game_executable_path(Path::new("/builds/9.1"));
        assert!(path.starts_with("/builds/9.1"));
        assert!(path.ends_with(GAME_EXECUTABLE_RELATIVE));
    }
}
