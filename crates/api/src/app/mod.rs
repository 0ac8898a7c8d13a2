//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: ledger, stores and uploads behind one shared handle
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    let jwt = Arc::new(stockledger_auth::Hs256JwtValidator::new(
        config.jwt_secret.as_bytes(),
    ));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(services::AppServices::in_memory(&config.blob_base_url));

    // Protected routes: require a valid bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/blobs/:key", get(routes::blobs::get_blob))
        .nest("/api/v1", protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
