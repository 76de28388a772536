use async_trait::async_trait;

use crate::entities::AnalysisRun;

/// Durable archive for completed analysis runs.
///
/// Exactly one implementation is active for the process lifetime, selected at
/// startup.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Writes the run's CSV, analysis, and metadata under its folder name.
    /// Write order is CSV, then analysis, then metadata; there is no
    /// atomicity across the three writes.
    async fn persist_run(&self, run: &AnalysisRun) -> anyhow::Result<()>;

    /// Storage mode label ("local" or "object-store").
    fn mode(&self) -> &'static str;
}
