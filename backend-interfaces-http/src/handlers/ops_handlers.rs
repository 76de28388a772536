use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use backend_application::queries::status_queries;
use backend_application::AppState;

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(status_queries::service_status(&state))
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(status_queries::health_status(&state))
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload)
}
