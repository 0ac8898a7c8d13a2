use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockledger_infra::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        LedgerError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        err @ LedgerError::Overconsumption { .. } => {
            json_error(StatusCode::CONFLICT, "overconsumption", err.to_string())
        }
        LedgerError::InvariantViolation(msg) => {
            json_error(StatusCode::CONFLICT, "invariant_violation", msg)
        }
        LedgerError::Storage(e) => {
            tracing::warn!(error = %e, "storage failure surfaced to client");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn invalid_id() -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id")
}
