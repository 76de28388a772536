pub mod analysis;
pub mod runtime;
pub mod transaction;

pub use analysis::{AnalysisRun, FlaggedTransaction, RunMetadata};
pub use runtime::RuntimeConfig;
pub use transaction::{TableError, TransactionRow, TransactionTable};
