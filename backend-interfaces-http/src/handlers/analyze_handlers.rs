use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};

use backend_application::commands::analyze_commands;
use backend_application::AppState;

use crate::error::HttpError;

/// `POST /analyze`: multipart upload with a `file` field holding one user's
/// transaction CSV. Replies `{"fraud_analysis": [...]}` on success.
pub async fn analyze_transactions(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, HttpError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| HttpError::BadRequest(format!("invalid multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = sanitize_filename(field.file_name());
        let data = field
            .bytes()
            .await
            .map_err(|err| HttpError::BadRequest(format!("failed to read upload: {err}")))?;
        upload = Some((filename, data.to_vec()));
        break;
    }

    let Some((filename, contents)) = upload else {
        return Err(HttpError::BadRequest(
            "multipart field 'file' is required".to_string(),
        ));
    };

    let analysis = analyze_commands::analyze_upload(&state, &filename, &contents).await?;
    Ok(Json(json!({ "fraud_analysis": analysis })))
}

/// Browsers may send a full client-side path as the filename; only the final
/// component is trusted, since it becomes an archive path component.
fn sanitize_filename(raw: Option<&str>) -> String {
    raw.and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "upload.csv".to_string())
}
