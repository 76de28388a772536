// Transaction table entity
// One upload holds the transactions of exactly one user (not validated here,
// assumed by the caller).

use csv::{ReaderBuilder, StringRecord, Writer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Malformed(#[from] csv::Error),
    #[error("{0}")]
    Write(String),
}

/// One row of the uploaded table. Identity fields repeat on every row since
/// the table belongs to a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRow {
    pub first: String,
    pub last: String,
    pub dob: String,
    pub street: String,
    pub trans_date_trans_time: String,
    pub cc_num: String,
    pub merchant: String,
    pub category: String,
    pub amt: f64,
    pub trans_num: String,
    pub unix_time: i64,
    pub merch_lat: f64,
    pub merch_long: f64,
}

/// The uploaded table, parsed into typed rows while keeping the raw header
/// and records so archiving re-serializes every column the client sent, not
/// just the ones this service understands.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
    rows: Vec<TransactionRow>,
}

impl TransactionTable {
    pub fn from_csv(data: &[u8]) -> Result<Self, TableError> {
        let mut reader = ReaderBuilder::new().from_reader(data);
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: TransactionRow = record.deserialize(Some(&headers))?;
            records.push(record);
            rows.push(row);
        }

        Ok(Self {
            headers,
            records,
            rows,
        })
    }

    /// Re-serializes the table as CSV, header first, rows in upload order.
    pub fn to_csv(&self) -> Result<String, TableError> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for record in &self.records {
            writer.write_record(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| TableError::Write(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| TableError::Write(err.to_string()))
    }

    pub fn rows(&self) -> &[TransactionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
