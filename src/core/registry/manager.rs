use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::model::Build;

const REGISTRY_FILE: &str = "builds.json";

/// Persisted collection of known builds, keyed by install path.
///
/// The on-disk file is a plain JSON array in insertion order. Loading
/// problems degrade to an empty registry; a launcher with no builds is
/// always preferable to one that cannot start.
pub struct BuildRegistry {
    registry_path: PathBuf,
    builds: Vec<Build>,
}

impl BuildRegistry {
    /// Load the registry from `data_dir`, or start empty.
    pub async fn load(data_dir: &Path) -> Self {
        let registry_path = data_dir.join(REGISTRY_FILE);

        let builds = match tokio::fs::read_to_string(&registry_path).await {
            Ok(json) => match serde_json::from_str::<Vec<Build>>(&json) {
                Ok(builds) => builds,
                Err(e) => {
                    warn!("Corrupt registry at {:?}: {}", registry_path, e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Cannot read registry {:?}: {}", registry_path, e);
                Vec::new()
            }
        };

        Self {
            registry_path,
            builds,
        }
    }

    /// Insert a build, or replace the entry already registered at its path.
    pub async fn add(&mut self, build: Build) {
        match self.builds.iter_mut().find(|b| b.path == build.path) {
            Some(existing) => *existing = build,
            None => {
                info!("Registered build '{}' at {:?}", build.title, build.path);
                self.builds.push(build);
            }
        }
        self.persist().await;
    }

    /// Remove the build registered at `path`. Returns whether it existed.
    pub async fn remove(&mut self, path: &Path) -> bool {
        let before = self.builds.len();
        self.builds.retain(|b| b.path != path);
        let removed = self.builds.len() != before;

        if removed {
            info!("Removed build at {:?}", path);
            self.persist().await;
        }
        removed
    }

    /// All registered builds in insertion order.
    pub fn list(&self) -> &[Build] {
        &self.builds
    }

    pub fn get(&self, path: &Path) -> Option<&Build> {
        self.builds.iter().find(|b| b.path == path)
    }

    /// Write-through persistence. Failures are logged, never fatal.
    async fn persist(&self) {
        let json = match serde_json::to_string_pretty(&self.builds) {
            Ok(json) => json,
            Err(e) => {
                warn!("Cannot serialize registry: {}", e);
                return;
            }
        };

        if let Some(parent) = self.registry_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                warn!("Cannot create registry directory {:?}: {}", parent, e);
                return;
            }
        }

        if let Err(e) = tokio::fs::write(&self.registry_path, json).await {
            warn!("Cannot persist registry {:?}: {}", self.registry_path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::model::InstallKind;

    fn sample(path: &str, version: &str) -> Build {
        Build::new(
            PathBuf::from(path),
            version,
            format!("Season {version}"),
            InstallKind::LegacyPak,
        )
    }

    #[tokio::test]
    async fn add_replaces_entry_with_same_path_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = BuildRegistry::load(dir.path()).await;

        registry.add(sample("/builds/a", "9.1")).await;
        registry.add(sample("/builds/b", "12.41")).await;
        registry.add(sample("/builds/a", "10.40")).await;

        let listed = registry.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].path, PathBuf::from("/builds/a"));
        assert_eq!(listed[0].version, "10.40");
        assert_eq!(listed[1].version, "12.41");
    }

    #[tokio::test]
    async fn registry_round_trips_across_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut registry = BuildRegistry::load(dir.path()).await;
            registry.add(sample("/builds/a", "9.1")).await;
            registry.add(sample("/builds/b", "12.41")).await;
            assert!(registry.remove(Path::new("/builds/b")).await);
            assert!(!registry.remove(Path::new("/builds/missing")).await);
        }

        let reloaded = BuildRegistry::load(dir.path()).await;
        assert_eq!(reloaded.list().len(), 1);
        assert_eq!(reloaded.list()[0].version, "9.1");
        assert!(reloaded.get(Path::new("/builds/a")).is_some());
    }

    #[tokio::test]
    async fn corrupt_registry_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(REGISTRY_FILE), b"{not json")
            .await
            .unwrap();

        let registry = BuildRegistry::load(dir.path()).await;
        assert!(registry.list().is_empty());
    }
}
