use axum::Router;

use backend_application::AppState;

use crate::handlers::{analyze_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", axum::routing::get(ops_handlers::root))
        .route("/health", axum::routing::get(ops_handlers::health_check))
        .route(
            "/analyze",
            axum::routing::post(analyze_handlers::analyze_transactions),
        )
        .route(
            "/metrics",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
