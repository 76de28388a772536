use std::sync::Arc;

use backend_domain::ports::{ArchiveStore, ModelBackend};
use backend_domain::RuntimeConfig;

use crate::Metrics;

/// Shared per-process state. The two backends are chosen once at startup and
/// are safe for concurrent use by in-flight requests; no request mutates
/// anything here apart from the metric counters.
#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub model: Arc<dyn ModelBackend>,
    pub store: Arc<dyn ArchiveStore>,
    pub metrics: Arc<Metrics>,
}
