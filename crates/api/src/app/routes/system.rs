use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::context::OwnerContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(owner): Extension<OwnerContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "ownerId": owner.owner().to_string(),
    }))
}
