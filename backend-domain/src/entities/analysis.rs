// Analysis run entities
// One upload-to-result cycle: the table, the model's analysis value, and the
// archive metadata. Created once, persisted once, never updated.

use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::TransactionTable;
use crate::value_objects::Confidence;

/// Second-granularity timestamp used in archive folder names and metadata.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One element of the model's output array, decoded leniently. The prompt
/// asks for exactly these keys, but the model is not trusted to comply:
/// missing fields fall back to defaults and unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlaggedTransaction {
    pub trans_num: String,
    pub trans_date_trans_time: String,
    pub reason: String,
    pub confidence: Confidence,
}

impl FlaggedTransaction {
    /// Lenient typed projection of the raw analysis value, used for logging
    /// and metrics. The client-visible payload stays the untouched value.
    pub fn collect(analysis: &Value) -> Vec<FlaggedTransaction> {
        analysis
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub original_filename: String,
    pub uploaded_at: String,
    pub num_transactions: usize,
    pub num_suspicious: usize,
    pub llm_version: String,
}

pub struct AnalysisRun {
    pub folder_name: String,
    pub table: TransactionTable,
    pub analysis: Value,
    pub metadata: RunMetadata,
}

impl AnalysisRun {
    pub fn new(
        table: TransactionTable,
        original_filename: &str,
        analysis: Value,
        llm_version: &str,
        uploaded_at: DateTime<Local>,
    ) -> Self {
        let uploaded_at = uploaded_at.format(ARCHIVE_TIMESTAMP_FORMAT).to_string();
        let folder_name = format!("{}_{}", file_stem(original_filename), uploaded_at);
        let metadata = RunMetadata {
            original_filename: original_filename.to_string(),
            uploaded_at,
            num_transactions: table.len(),
            num_suspicious: analysis.as_array().map(Vec::len).unwrap_or_default(),
            llm_version: llm_version.to_string(),
        };
        Self {
            folder_name,
            table,
            analysis,
            metadata,
        }
    }
}

fn file_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const SAMPLE: &str = "\
first,last,dob,street,trans_date_trans_time,cc_num,merchant,category,amt,trans_num,unix_time,merch_lat,merch_long
Jane,Doe,1988-03-09,1 Main St,2024-05-01 03:12:00,4111111111111111,Web Bazaar,misc_net,950.0,a1b2,1714525920,40.1,-74.2
";

    fn sample_table() -> TransactionTable {
        TransactionTable::from_csv(SAMPLE.as_bytes()).expect("parse sample table")
    }

    #[test]
    fn folder_name_combines_stem_and_timestamp() {
        let uploaded_at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap();
        let run = AnalysisRun::new(sample_table(), "march_data.csv", json!([]), "gpt-4o-mini", uploaded_at);
        assert_eq!(run.folder_name, "march_data_20240501_093015");
        assert_eq!(run.metadata.uploaded_at, "20240501_093015");
        assert_eq!(run.metadata.original_filename, "march_data.csv");
    }

    #[test]
    fn metadata_counts_rows_and_flags() {
        let uploaded_at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap();
        let analysis = json!([
            {"trans_num": "a1b2", "reason": "late-night online purchase", "confidence": "high"},
        ]);
        let run = AnalysisRun::new(sample_table(), "data.csv", analysis, "gpt-4o-mini", uploaded_at);
        assert_eq!(run.metadata.num_transactions, 1);
        assert_eq!(run.metadata.num_suspicious, 1);
        assert_eq!(run.metadata.llm_version, "gpt-4o-mini");
    }

    #[test]
    fn collect_tolerates_partial_and_foreign_shapes() {
        let analysis = json!([
            {"trans_num": "a1b2", "trans_date_trans_time": "2024-05-01 03:12:00", "reason": "odd hours", "confidence": "medium"},
            {"reason": "missing ids"},
            "not an object",
        ]);
        let flagged = FlaggedTransaction::collect(&analysis);
        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0].confidence, Confidence::Medium);
        assert!(flagged[1].trans_num.is_empty());

        assert!(FlaggedTransaction::collect(&json!({"detail": "no array"})).is_empty());
    }
}
