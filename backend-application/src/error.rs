use thiserror::Error;

/// Failure taxonomy of one analysis request. Everything is caught at the HTTP
/// boundary and converted into a single structured error response; nothing is
/// retried anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upload parsed but produced zero rows; reported before any model call.
    #[error("Uploaded CSV is empty")]
    EmptyInput,
    /// Upload is not valid CSV for the expected schema.
    #[error("CSV parse error: {0}")]
    MalformedInput(String),
    /// The active model backend failed (network, auth, quota).
    #[error("Model backend error: {0}")]
    ModelInvocation(#[source] anyhow::Error),
    /// Model replied, but the reply is not JSON even after fence stripping.
    /// Carries the raw output for diagnosis.
    #[error("Failed to parse JSON from model: {message}\nRaw output: {raw_output}")]
    ModelOutput { message: String, raw_output: String },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
