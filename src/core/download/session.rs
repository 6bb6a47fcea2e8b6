use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::core::resolver::RequiredAsset;

/// Typed progress event for one acquisition session.
///
/// Delivered in-order per asset (`AssetStarted` → `AssetProgressed`* →
/// `AssetCompleted`); events of different assets interleave freely.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadEvent {
    AssetStarted {
        name: String,
    },
    AssetProgressed {
        name: String,
        percent: f64,
        bytes_per_sec: f64,
    },
    AssetCompleted {
        name: String,
        error: Option<String>,
    },
    SessionDone,
}

/// In-memory aggregate of progress/completion for one acquisition attempt.
///
/// Mutated only by the orchestrator's event consumer; callers observe
/// cloned snapshots. Discarded when acquisition ends.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadSession {
    pub id: Uuid,
    /// All required asset names, in resolution order.
    pub files: Vec<String>,
    /// Settled asset names. Grows monotonically, never shrinks.
    pub completed: Vec<String>,
    /// Per-asset progress, 0–100.
    pub progress: HashMap<String, f64>,
    /// Per-asset transfer rate in bytes per second.
    pub speeds: HashMap<String, f64>,
    /// Per-asset status text, including error text for failed fetches.
    pub messages: HashMap<String, String>,
}

impl DownloadSession {
    pub fn new(assets: &[RequiredAsset]) -> Self {
        Self {
            id: Uuid::new_v4(),
            files: assets.iter().map(|a| a.name.clone()).collect(),
            completed: Vec::new(),
            progress: HashMap::new(),
            speeds: HashMap::new(),
            messages: HashMap::new(),
        }
    }

    /// Overall completion as settled / total.
    pub fn overall_percent(&self) -> f64 {
        if self.files.is_empty() {
            return 100.0;
        }
        self.completed.len() as f64 / self.files.len() as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.completed.len() == self.files.len()
    }

    /// Fold one event into the aggregate.
    pub fn apply(&mut self, event: &DownloadEvent) {
        match event {
            DownloadEvent::AssetStarted { name } => {
                self.progress.insert(name.clone(), 0.0);
            }
            DownloadEvent::AssetProgressed {
                name,
                percent,
                bytes_per_sec,
            } => {
                self.progress.insert(name.clone(), *percent);
                self.speeds.insert(name.clone(), *bytes_per_sec);
            }
            DownloadEvent::AssetCompleted { name, error } => {
                self.progress.insert(name.clone(), 100.0);
                if let Some(error) = error {
                    self.messages.insert(name.clone(), error.clone());
                }
                if !self.completed.iter().any(|done| done == name) {
                    self.completed.push(name.clone());
                }
            }
            DownloadEvent::SessionDone => {}
        }
    }
}

/// Human-readable remaining-time estimate.
pub fn format_eta(seconds: f64) -> String {
    if seconds.is_infinite() || seconds.is_nan() || seconds <= 0.0 {
        return "Calculating...".to_string();
    }

    let hours = (seconds / 3600.0).floor();
    let minutes = ((seconds % 3600.0) / 60.0).floor();
    let secs = seconds % 60.0;

    if hours > 0.0 {
        format!("{hours:.0}h {minutes:.0}m {secs:.0}s")
    } else if minutes > 0.0 {
        format!("{minutes:.0}m {secs:.0}s")
    } else {
        format!("{secs:.0}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::resolve;

    #[test]
    fn completed_set_is_monotonic_and_deduplicated() {
        let assets = resolve("9.1");
        let mut session = DownloadSession::new(&assets);
        let name = assets[0].name.clone();

        session.apply(&DownloadEvent::AssetCompleted {
            name: name.clone(),
            error: None,
        });
        assert_eq!(session.completed, vec![name.clone()]);

        // settling twice must not shrink or duplicate
        session.apply(&DownloadEvent::AssetCompleted {
            name: name.clone(),
            error: Some("late transport error".into()),
        });
        assert_eq!(session.completed, vec![name.clone()]);
        assert_eq!(
            session.messages.get(&name).map(String::as_str),
            Some("late transport error")
        );
    }

    #[test]
    fn overall_percent_tracks_settled_over_total() {
        let assets = resolve("9.1");
        let mut session = DownloadSession::new(&assets);
        assert_eq!(session.overall_percent(), 0.0);

        session.apply(&DownloadEvent::AssetCompleted {
            name: assets[1].name.clone(),
            error: None,
        });
        assert!((session.overall_percent() - 100.0 / 3.0).abs() < 1e-9);
        assert!(!session.is_complete());
    }

    #[test]
    fn empty_session_is_already_complete() {
        let session = DownloadSession::new(&[]);
        assert_eq!(session.overall_percent(), 100.0);
        assert!(session.is_complete());
    }

    #[test]
    fn progress_events_update_rate_and_percent() {
        let assets = resolve("9.1");
        let mut session = DownloadSession::new(&assets);
        session.apply(&DownloadEvent::AssetProgressed {
            name: assets[0].name.clone(),
            percent: 42.5,
            bytes_per_sec: 1024.0,
        });
        assert_eq!(session.progress[&assets[0].name], 42.5);
        assert_eq!(session.speeds[&assets[0].name], 1024.0);
    }

    #[test]
    fn eta_formatting() {
        assert_eq!(format_eta(f64::INFINITY), "Calculating...");
        assert_eq!(format_eta(0.0), "Calculating...");
        assert_eq!(format_eta(42.0), "42s");
        assert_eq!(format_eta(125.0), "2m 5s");
        assert_eq!(format_eta(3725.0), "1h 2m 5s");
    }
}
