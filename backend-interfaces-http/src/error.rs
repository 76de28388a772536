use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use backend_application::AppError;

/// HTTP-facing error. `ServerError` details are exposed to the caller (model
/// failures and unparseable model output carry diagnostic value); `Internal`
/// details are logged and replaced with a generic message.
#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    ServerError(String),
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            err @ (AppError::EmptyInput | AppError::MalformedInput(_)) => {
                HttpError::BadRequest(err.to_string())
            }
            err @ (AppError::ModelInvocation(_) | AppError::ModelOutput { .. }) => {
                HttpError::ServerError(err.to_string())
            }
            AppError::Internal(err) => HttpError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            HttpError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            HttpError::ServerError(detail) => {
                error!("analysis failed: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
            HttpError::Internal(detail) => {
                error!("unhandled error during analysis: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
