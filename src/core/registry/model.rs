use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::capability::game_executable_path;

/// How a build got onto disk — strongly typed, no magic strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstallKind {
    /// Installed from the hosted catalog via a chunked manifest.
    Manifest,
    /// Pre-existing installation registered from a local directory.
    LegacyPak,
}

/// A registered local installation of one game version.
///
/// Keyed by its install path; immutable once registered apart from
/// explicit removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub path: PathBuf,
    pub version: String,
    pub title: String,
    /// Splash image reference shown in the library view.
    pub splash: Option<String>,
    pub install_kind: InstallKind,
    pub registered_at: DateTime<Utc>,
}

impl Build {
    pub fn new(
        path: PathBuf,
        version: impl Into<String>,
        title: impl Into<String>,
        install_kind: InstallKind,
    ) -> Self {
        Self {
            path,
            version: version.into(),
            title: title.into(),
            splash: None,
            install_kind,
            registered_at: Utc::now(),
        }
    }

    /// Path to the game client executable inside this installation.
    pub fn executable_path(&self) -> PathBuf {
        game_executable_path(&self.path)
    }
}
