use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use stockledger_core::RecordId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::OwnerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/filter", get(filter_items))
        .route("/categories", get(list_categories))
        .route("/summary", get(get_summary))
        .route("/:id", patch(edit_item).delete(delete_item))
        .route("/:id/consume", patch(consume_item))
        .route("/:id/history", get(get_history))
        .route("/:id/image", post(upload_image))
}

fn parse_id(raw: &str) -> Result<RecordId, axum::response::Response> {
    raw.parse().map_err(|_| errors::invalid_id())
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.ledger.get(owner.owner()) {
        Ok(records) => {
            let items: Vec<dto::ItemResponse> = records
                .iter()
                .map(|r| dto::ItemResponse::from(&r.snapshot()))
                .collect();
            Json(dto::envelope(items)).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    match services.ledger.create(owner.owner(), body.into()) {
        Ok(record) => (
            StatusCode::CREATED,
            Json(dto::envelope(dto::ItemResponse::from(&record.snapshot()))),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn consume_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ConsumeRequest>,
) -> axum::response::Response {
    let record_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .ledger
        .consume(owner.owner(), record_id, body.amount_used)
    {
        Ok(record) => Json(dto::envelope(dto::ItemResponse::from(&record.snapshot()))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let record_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.delete(owner.owner(), record_id) {
        Ok(deleted) => Json(serde_json::json!({
            "message": "item deleted",
            "data": { "_id": deleted.to_string() },
        }))
        .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn edit_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::EditItemRequest>,
) -> axum::response::Response {
    let record_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.edit(owner.owner(), record_id, body.into()) {
        Ok(record) => Json(dto::envelope(dto::ItemResponse::from(&record.snapshot()))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn filter_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Query(query): Query<dto::FilterQuery>,
) -> axum::response::Response {
    let criteria = match query.into_criteria() {
        Ok(c) => c,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match services.ledger.filter(owner.owner(), &criteria) {
        Ok(rows) => {
            let rows: Vec<dto::ViewItemResponse> =
                rows.iter().map(dto::ViewItemResponse::from).collect();
            Json(dto::envelope(rows)).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.ledger.categories(owner.owner()) {
        Ok(categories) => Json(dto::envelope(categories)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.ledger.summary(owner.owner()) {
        Ok(summary) => Json(dto::envelope(dto::SummaryResponse::from(summary))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let record_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger.history(owner.owner(), record_id) {
        Ok(entries) => {
            let rows: Vec<dto::ViewItemResponse> =
                entries.iter().map(dto::ViewItemResponse::from).collect();
            Json(dto::envelope(rows)).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// Body is the raw image; `Content-Type` is stored alongside it.
pub async fn upload_image(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let record_id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    match services.attach_image(owner.owner(), record_id, content_type, body.to_vec()) {
        Ok(record) => Json(dto::envelope(dto::ItemResponse::from(&record.snapshot()))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
