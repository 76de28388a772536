use async_trait::async_trait;

/// Abstraction over the configured LLM backend.
///
/// Exactly one implementation is active for the process lifetime, selected at
/// startup. Transport and service errors surface to the orchestrator
/// unretried.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Sends the prompt pair and returns the raw completion text, which may
    /// be fence-wrapped and may not be valid JSON.
    async fn invoke(&self, system_prompt: &str, user_prompt: &str) -> anyhow::Result<String>;

    /// Identifier of the underlying model, reported in status and metadata.
    fn model_id(&self) -> &str;

    /// Short backend label ("openai" or "gemini").
    fn backend_name(&self) -> &'static str;
}
