// Local archive store
// One directory per run under the configured root: the original CSV, the
// pretty-printed analysis, and the metadata summary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;

use backend_domain::entities::AnalysisRun;
use backend_domain::ports::ArchiveStore;

pub struct LocalArchive {
    root: PathBuf,
}

impl LocalArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArchiveStore for LocalArchive {
    async fn persist_run(&self, run: &AnalysisRun) -> Result<()> {
        let folder = self.root.join(&run.folder_name);
        fs::create_dir_all(&folder)
            .await
            .with_context(|| format!("create archive folder {}", folder.display()))?;

        let csv_text = run.table.to_csv()?;
        fs::write(folder.join(&run.metadata.original_filename), csv_text).await?;

        let analysis = serde_json::to_string_pretty(&run.analysis)?;
        fs::write(folder.join("analysis.json"), analysis).await?;

        let metadata = serde_json::to_string_pretty(&run.metadata)?;
        fs::write(folder.join("metadata.json"), metadata).await?;

        Ok(())
    }

    fn mode(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use serde_json::json;
    use uuid::Uuid;

    use backend_domain::entities::{RunMetadata, TransactionTable};

    const SAMPLE_CSV: &str = "\
first,last,dob,street,trans_date_trans_time,cc_num,merchant,category,amt,trans_num,unix_time,merch_lat,merch_long
Jane,Doe,1988-03-09,1 Main St,2024-05-01 03:12:00,4111111111111111,Web Bazaar,misc_net,950.0,tx-c,1714525920,40.1,-74.2
";

    #[tokio::test]
    async fn run_round_trips_through_the_archive() {
        let root = std::env::temp_dir().join(format!("guardian-archive-{}", Uuid::new_v4()));
        let store = LocalArchive::new(&root);

        let table = TransactionTable::from_csv(SAMPLE_CSV.as_bytes()).expect("parse table");
        let analysis = json!([
            {"trans_num": "tx-c", "trans_date_trans_time": "2024-05-01 03:12:00", "reason": "large late-night online purchase", "confidence": "high"},
        ]);
        let uploaded_at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap();
        let run = AnalysisRun::new(table, "may_data.csv", analysis.clone(), "gpt-4o-mini", uploaded_at);

        store.persist_run(&run).await.expect("persist run");

        let folder = root.join("may_data_20240501_093015");
        let csv_back = fs::read_to_string(folder.join("may_data.csv"))
            .await
            .expect("read archived csv");
        let reparsed = TransactionTable::from_csv(csv_back.as_bytes()).expect("reparse archived csv");
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed.rows()[0].trans_num, "tx-c");

        let analysis_back: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(folder.join("analysis.json"))
                .await
                .expect("read archived analysis"),
        )
        .expect("decode archived analysis");
        assert_eq!(analysis_back, analysis);

        let metadata_back: RunMetadata = serde_json::from_str(
            &fs::read_to_string(folder.join("metadata.json"))
                .await
                .expect("read archived metadata"),
        )
        .expect("decode archived metadata");
        assert_eq!(metadata_back.original_filename, "may_data.csv");
        assert_eq!(metadata_back.num_transactions, 1);
        assert_eq!(metadata_back.num_suspicious, 1);
        assert_eq!(metadata_back.llm_version, "gpt-4o-mini");

        // Exactly the three artifacts, nothing else.
        let mut entries = fs::read_dir(&folder).await.expect("list folder");
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.expect("read entry") {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        assert_eq!(names, vec!["analysis.json", "may_data.csv", "metadata.json"]);

        fs::remove_dir_all(&root).await.expect("cleanup");
    }

    #[test]
    fn mode_is_local() {
        assert_eq!(LocalArchive::new("/tmp").mode(), "local");
    }
}
