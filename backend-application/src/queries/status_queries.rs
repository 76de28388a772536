use serde_json::{json, Value};

use crate::AppState;

/// Payload for `GET /`: which backends this process runs with.
pub fn service_status(state: &AppState) -> Value {
    json!({
        "message": "AI Transaction Guardian Service",
        "storage": state.store.mode(),
        "model_backend": state.model.backend_name(),
        "llm_model": state.model.model_id(),
    })
}

/// Payload for `GET /health`: liveness plus the two backend toggles.
pub fn health_status(state: &AppState) -> Value {
    json!({
        "status": "healthy",
        "use_object_store": state.store.mode() == "object-store",
        "use_gemini": state.model.backend_name() == "gemini",
    })
}
