use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::OwnerContext;

pub fn router() -> Router {
    Router::new()
        .route("/upload-receipt", post(upload_receipt))
        .route("/get-receipt", get(list_receipts))
}

/// Body is the raw file; the title comes from the query string.
pub async fn upload_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Query(query): Query<dto::ReceiptUploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let title = query.title.unwrap_or_default();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    match services
        .uploads
        .upload_receipt(owner.owner(), &title, content_type, body.to_vec())
    {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(dto::UploadReceiptResponse {
                message: "receipt uploaded",
                receipt_id: receipt.id.to_string(),
                title: receipt.title.clone(),
                receipt_url: receipt.url.as_str().to_string(),
            }),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_receipts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.uploads.receipts(owner.owner()) {
        Ok(receipts) => {
            let receipts: Vec<dto::ReceiptResponse> =
                receipts.iter().map(dto::ReceiptResponse::from).collect();
            Json(dto::ReceiptListResponse {
                message: "receipts fetched",
                count: receipts.len(),
                receipts,
            })
            .into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}
