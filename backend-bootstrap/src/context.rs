use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use backend_application::{AppState, Metrics};
use backend_domain::ports::{ArchiveStore, ModelBackend};
use backend_infrastructure::{AppConfig, BucketArchive, GeminiService, LocalArchive, OpenAiService};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();
        let model_timeout = Duration::from_secs(config.model_timeout_seconds.max(3));
        let store_timeout = Duration::from_secs(config.request_timeout_seconds.max(3));

        let model: Arc<dyn ModelBackend> = if config.use_gemini {
            let api_key = config.gemini_api_key.clone().unwrap_or_default();
            if api_key.is_empty() {
                warn!("gemini_api_key not configured, model calls will be rejected upstream");
            }
            Arc::new(GeminiService::new(
                api_key,
                config.gemini_model.clone(),
                model_timeout,
            )?)
        } else {
            let api_key = config.openai_api_key.clone().unwrap_or_default();
            if api_key.is_empty() {
                warn!("openai_api_key not configured, model calls will be rejected upstream");
            }
            Arc::new(OpenAiService::new(
                api_key,
                config.openai_model.clone(),
                model_timeout,
            )?)
        };

        let store: Arc<dyn ArchiveStore> = if config.use_object_store {
            Arc::new(BucketArchive::new(
                config.bucket_endpoint.clone(),
                config.bucket_name.clone(),
                config.bucket_token.clone(),
                store_timeout,
            )?)
        } else {
            Arc::new(LocalArchive::new(config.archive_dir.clone()))
        };

        info!(
            backend = model.backend_name(),
            model = config.active_model_id(),
            storage = store.mode(),
            "backends configured"
        );

        let state = AppState {
            config: runtime_config,
            model,
            store,
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
