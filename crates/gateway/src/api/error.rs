//! Standardized JSON error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use mitra_domain::error::Error;

/// Build a `{ "error": "<message>" }` response with the given status.
pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Map a domain error that escaped a handler to a 500 response. The
/// detail goes to the log, not the client.
pub fn internal_error(e: Error) -> Response {
    tracing::error!(error = %e, "handler failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}
