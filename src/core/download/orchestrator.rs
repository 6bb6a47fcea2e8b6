// ─── Download Orchestrator ───
// Fans out one fetch task per required asset, funnels their typed events
// through a single consumer, and resolves once every asset has settled.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::session::{format_eta, DownloadEvent, DownloadSession};
use crate::core::capability::AssetStore;
use crate::core::resolver::{always_refetch, RequiredAsset};

/// Concurrent asset acquisition with partial-failure isolation.
///
/// A failed fetch is recorded against its asset and never aborts the
/// siblings; `run` always reaches "all settled". There is no cancellation:
/// once started, in-flight fetches run to completion.
pub struct DownloadOrchestrator {
    store: Arc<dyn AssetStore>,
    events: Option<mpsc::UnboundedSender<DownloadEvent>>,
    snapshots: Option<watch::Sender<DownloadSession>>,
}

impl DownloadOrchestrator {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            events: None,
            snapshots: None,
        }
    }

    /// Forward every `DownloadEvent` to `tx` as it is applied.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<DownloadEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Publish a full session snapshot after each asset settles.
    pub fn with_snapshots(mut self, tx: watch::Sender<DownloadSession>) -> Self {
        self.snapshots = Some(tx);
        self
    }

    /// Acquire `assets` into `target_dir`, resolving after every asset has
    /// settled. The returned session records completion, per-asset progress
    /// and any per-asset error text.
    pub async fn run(&self, target_dir: &Path, assets: &[RequiredAsset]) -> DownloadSession {
        let mut session = DownloadSession::new(assets);

        if assets.is_empty() {
            self.publish_done(&session);
            return session;
        }

        info!(
            "Acquiring {} assets into {:?} (session {})",
            assets.len(),
            target_dir,
            session.id
        );

        let (tx, mut rx) = mpsc::unbounded_channel::<DownloadEvent>();

        // One task per asset, unbounded fan-out, no relative ordering.
        // Outcomes land in a fixed-size vector indexed by asset; each slot
        // is written exactly once when its task settles.
        let fan_out = join_all(assets.iter().map(|asset| {
            let tx = tx.clone();
            async move { self.acquire_one(target_dir, asset, &tx).await }
        }));
        drop(tx);

        let (outcomes, ()) = tokio::join!(fan_out, async {
            while let Some(event) = rx.recv().await {
                session.apply(&event);
                let settled = matches!(event, DownloadEvent::AssetCompleted { .. });
                if let Some(events) = &self.events {
                    let _ = events.send(event);
                }
                if settled {
                    if let Some(snapshots) = &self.snapshots {
                        let _ = snapshots.send(session.clone());
                    }
                }
            }
        });

        let failed = outcomes.iter().flatten().count();
        if failed > 0 {
            warn!(
                "Acquisition finished with {failed}/{} failed assets",
                assets.len()
            );
        } else {
            info!("Acquisition finished: {} assets settled", assets.len());
        }

        self.publish_done(&session);
        session
    }

    /// Settle a single asset: probe, fetch if needed, always complete.
    /// Returns the recorded error text, if any.
    async fn acquire_one(
        &self,
        target_dir: &Path,
        asset: &RequiredAsset,
        tx: &mpsc::UnboundedSender<DownloadEvent>,
    ) -> Option<String> {
        let _ = tx.send(DownloadEvent::AssetStarted {
            name: asset.name.clone(),
        });

        let dest = target_dir.join(&asset.name);
        let up_to_date =
            !always_refetch(&asset.name) && self.store.exists(&dest, Some(asset.size)).await;

        let error = if up_to_date {
            debug!("Asset up to date: {}", asset.name);
            None
        } else {
            let started = Instant::now();
            let name = asset.name.clone();
            let expected = asset.size;
            let progress_tx = tx.clone();
            let on_progress = move |bytes: u64, total: Option<u64>| {
                let total = total.unwrap_or(expected).max(1);
                let percent = (bytes as f64 / total as f64 * 100.0).min(100.0);
                let elapsed = started.elapsed().as_secs_f64();
                let rate = if elapsed > 0.0 {
                    bytes as f64 / elapsed
                } else {
                    0.0
                };
                let remaining = total.saturating_sub(bytes) as f64;
                let eta = if rate > 0.0 {
                    remaining / rate
                } else {
                    f64::INFINITY
                };
                debug!("{name}: {percent:.1}%, {} left", format_eta(eta));
                let _ = progress_tx.send(DownloadEvent::AssetProgressed {
                    name: name.clone(),
                    percent,
                    bytes_per_sec: rate,
                });
            };

            match self.store.fetch(&asset.url, &dest, &on_progress).await {
                Ok(()) => None,
                Err(e) => {
                    warn!("Fetch failed for {}: {}", asset.name, e);
                    Some(e.to_string())
                }
            }
        };

        // A failed fetch settles exactly like a successful one.
        let _ = tx.send(DownloadEvent::AssetCompleted {
            name: asset.name.clone(),
            error: error.clone(),
        });
        error
    }

    fn publish_done(&self, session: &DownloadSession) {
        if let Some(events) = &self.events {
            let _ = events.send(DownloadEvent::SessionDone);
        }
        if let Some(snapshots) = &self.snapshots {
            let _ = snapshots.send(session.clone());
        }
    }
}
