use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::app::errors;
use crate::app::services::AppServices;

/// Serve an uploaded image or receipt by key.
pub async fn get_blob(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
) -> axum::response::Response {
    match services.uploads.blob(&key) {
        Ok(Some(blob)) => {
            let content_type = blob
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string());
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], blob.bytes).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "blob not found"),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
