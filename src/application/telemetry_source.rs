// Source trait for telemetry snapshots
use crate::domain::telemetry::TelemetrySnapshot;
use async_trait::async_trait;

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Produce the next complete snapshot.
    async fn next_snapshot(&self) -> anyhow::Result<TelemetrySnapshot>;
}
