//! Liveness and readiness probes.

use axum::extract::State;
use axum::response::{IntoResponse, Json};

use crate::state::AppState;

/// `GET /health` — process is up.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /ready` — configuration summary for probes and operators.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "generation": {
            "models": state.config.generation.models,
            "key_count": state.generator.rotator().key_count(),
            "timeout_ms": state.config.generation.timeout_ms,
        },
        "sessions": state.sessions.len(),
        "auth": {
            "api_token": state.api_token_hash.is_some(),
            "admin_token": state.admin_token_hash.is_some(),
        },
    }))
}
