use axum::{Router, routing::get};

pub mod blobs;
pub mod items;
pub mod receipts;
pub mod system;

/// Router for all authenticated (owner-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/items", items::router().merge(receipts::router()))
}
