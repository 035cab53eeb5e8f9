// Telemetry feed - single ticking producer fanned out to every subscriber
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::telemetry::TelemetrySnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Clone)]
pub struct TelemetryFeed {
    source: Arc<dyn TelemetrySource>,
    latest: Arc<RwLock<Option<Arc<TelemetrySnapshot>>>>,
    update_tx: broadcast::Sender<Arc<TelemetrySnapshot>>,
}

impl TelemetryFeed {
    pub fn new(source: Arc<dyn TelemetrySource>, channel_capacity: usize) -> Self {
        let (update_tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            source,
            latest: Arc::new(RwLock::new(None)),
            update_tx,
        }
    }

    /// Most recent snapshot, if a tick has completed yet.
    pub async fn latest(&self) -> Option<Arc<TelemetrySnapshot>> {
        self.latest.read().await.clone()
    }

    /// Receive every snapshot published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<TelemetrySnapshot>> {
        self.update_tx.subscribe()
    }

    /// Pull one snapshot from the source, store it as latest and publish it.
    pub async fn tick(&self) -> anyhow::Result<Arc<TelemetrySnapshot>> {
        let snapshot = Arc::new(self.source.next_snapshot().await?);
        *self.latest.write().await = Some(snapshot.clone());

        // No subscribers is fine; the snapshot is still kept as latest
        let receivers = self.update_tx.send(snapshot.clone()).unwrap_or(0);
        tracing::trace!(receivers, signals = snapshot.len(), "published snapshot");

        Ok(snapshot)
    }

    /// Tick every `period` until the returned task is aborted.
    pub fn spawn(&self, period: Duration) -> JoinHandle<()> {
        let feed = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if let Err(e) = feed.tick().await {
                    tracing::error!("Failed to produce telemetry snapshot: {:#}", e);
                }
            }
        })
    }
}
