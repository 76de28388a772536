// Analyze command
// The whole pipeline for one upload, strictly sequential:
// parse table -> guard empty -> build prompt -> invoke model -> normalize
// -> archive -> respond. Any failure short-circuits the remaining steps.

use chrono::Local;
use serde_json::Value;
use tracing::{info, warn};

use backend_domain::entities::{AnalysisRun, FlaggedTransaction, TransactionTable};
use backend_domain::services::{build_prompt, parse_analysis};
use backend_domain::Confidence;

use crate::{AppError, AppState};

pub async fn analyze_upload(
    state: &AppState,
    filename: &str,
    contents: &[u8],
) -> Result<Value, AppError> {
    match run_pipeline(state, filename, contents).await {
        Ok(analysis) => Ok(analysis),
        Err(err) => {
            state.metrics.record_failure();
            Err(err)
        }
    }
}

async fn run_pipeline(
    state: &AppState,
    filename: &str,
    contents: &[u8],
) -> Result<Value, AppError> {
    let table = TransactionTable::from_csv(contents)
        .map_err(|err| AppError::MalformedInput(err.to_string()))?;
    if table.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let prompt = build_prompt(&table)?;
    let raw_output = state
        .model
        .invoke(&prompt.system, &prompt.user)
        .await
        .map_err(AppError::ModelInvocation)?;

    let analysis = parse_analysis(&raw_output).map_err(|err| AppError::ModelOutput {
        message: err.to_string(),
        raw_output: raw_output.clone(),
    })?;

    let flagged = FlaggedTransaction::collect(&analysis);
    let high_confidence = flagged
        .iter()
        .filter(|item| item.confidence == Confidence::High)
        .count();
    info!(
        rows = table.len(),
        flagged = flagged.len(),
        high_confidence,
        model = state.model.model_id(),
        "analysis complete"
    );

    let run = AnalysisRun::new(
        table,
        filename,
        analysis,
        state.model.model_id(),
        Local::now(),
    );
    // Archiving is best-effort: the analysis already succeeded, so a storage
    // failure is logged and the response still goes out.
    if let Err(err) = state.store.persist_run(&run).await {
        warn!("failed to archive run '{}': {}", run.folder_name, err);
    }
    state
        .metrics
        .record_analysis(run.metadata.num_transactions, run.metadata.num_suspicious);

    Ok(run.analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use backend_domain::ports::{ArchiveStore, ModelBackend};
    use backend_domain::RuntimeConfig;

    use crate::Metrics;

    const SAMPLE_CSV: &str = "\
first,last,dob,street,trans_date_trans_time,cc_num,merchant,category,amt,trans_num,unix_time,merch_lat,merch_long
Jane,Doe,1988-03-09,1 Main St,2024-05-01 03:12:00,4111111111111111,Web Bazaar,misc_net,950.0,tx-c,1714525920,40.1,-74.2
";

    struct ScriptedModel {
        calls: AtomicUsize,
        reply: Option<String>,
    }

    impl ScriptedModel {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Some(text.to_string()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: None,
            })
        }
    }

    #[async_trait]
    impl ModelBackend for ScriptedModel {
        async fn invoke(&self, _system_prompt: &str, _user_prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(anyhow::anyhow!("model unavailable")),
            }
        }

        fn model_id(&self) -> &str {
            "test-model"
        }

        fn backend_name(&self) -> &'static str {
            "test"
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        folders: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ArchiveStore for MemoryStore {
        async fn persist_run(&self, run: &AnalysisRun) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("archive offline");
            }
            self.folders
                .lock()
                .expect("folders lock")
                .push(run.folder_name.clone());
            Ok(())
        }

        fn mode(&self) -> &'static str {
            "local"
        }
    }

    fn state_with(model: Arc<ScriptedModel>, store: Arc<MemoryStore>) -> AppState {
        AppState {
            config: RuntimeConfig {
                bind_addr: "127.0.0.1:0".to_string(),
                cors_origins: Vec::new(),
                max_body_bytes: 1024 * 1024,
                request_timeout_seconds: 5,
            },
            model,
            store,
            metrics: Arc::new(Metrics::default()),
        }
    }

    #[tokio::test]
    async fn empty_upload_never_reaches_the_model() {
        let model = ScriptedModel::replying("[]");
        let state = state_with(model.clone(), Arc::new(MemoryStore::default()));

        let header_only = SAMPLE_CSV.lines().next().expect("header line");
        let err = analyze_upload(&state, "empty.csv", header_only.as_bytes())
            .await
            .expect_err("reject empty upload");

        assert!(matches!(err, AppError::EmptyInput));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_upload_is_a_client_error() {
        let model = ScriptedModel::replying("[]");
        let state = state_with(model.clone(), Arc::new(MemoryStore::default()));

        let err = analyze_upload(&state, "bad.csv", b"first,last\nJane,Doe\n")
            .await
            .expect_err("reject malformed upload");

        assert!(matches!(err, AppError::MalformedInput(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fenced_reply_is_normalized_and_archived() {
        let reply = "```json\n[{\"trans_num\": \"tx-c\", \"trans_date_trans_time\": \"2024-05-01 03:12:00\", \"reason\": \"late-night online purchase of 950\", \"confidence\": \"high\"}]\n```";
        let store = Arc::new(MemoryStore::default());
        let state = state_with(ScriptedModel::replying(reply), store.clone());

        let analysis = analyze_upload(&state, "may_data.csv", SAMPLE_CSV.as_bytes())
            .await
            .expect("analysis succeeds");

        assert_eq!(analysis.as_array().map(Vec::len), Some(1));
        assert_eq!(analysis[0]["confidence"], json!("high"));

        let folders = store.folders.lock().expect("folders lock");
        assert_eq!(folders.len(), 1);
        assert!(folders[0].starts_with("may_data_"));
    }

    #[tokio::test]
    async fn prose_reply_surfaces_the_raw_output() {
        let reply = "Transaction tx-c looks fraudulent to me.";
        let state = state_with(ScriptedModel::replying(reply), Arc::new(MemoryStore::default()));

        let err = analyze_upload(&state, "data.csv", SAMPLE_CSV.as_bytes())
            .await
            .expect_err("reject unparseable reply");

        match err {
            AppError::ModelOutput { raw_output, .. } => assert_eq!(raw_output, reply),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn model_failure_is_a_server_error() {
        let model = ScriptedModel::failing();
        let state = state_with(model.clone(), Arc::new(MemoryStore::default()));

        let err = analyze_upload(&state, "data.csv", SAMPLE_CSV.as_bytes())
            .await
            .expect_err("surface model failure");

        assert!(matches!(err, AppError::ModelInvocation(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn archive_failure_does_not_fail_the_request() {
        let store = Arc::new(MemoryStore {
            folders: Mutex::new(Vec::new()),
            fail: true,
        });
        let state = state_with(ScriptedModel::replying("[]"), store);

        let analysis = analyze_upload(&state, "data.csv", SAMPLE_CSV.as_bytes())
            .await
            .expect("analysis still succeeds");
        assert_eq!(analysis, json!([]));
    }
}
