//! API authentication middleware and the user-identity extractor.
//!
//! Bearer tokens are read from the env vars named by
//! `config.server.api_token_env` / `admin_token_env` **once at startup**;
//! their SHA-256 digests are cached in `AppState`.
//! - If a var is set and non-empty, matching requests must carry
//!   `Authorization: Bearer <token>`.
//! - If a var is unset or empty, the server logs a warning once and
//!   allows unauthenticated access (dev mode).
//!
//! End-user identity is a plain `x-user-id` header — who the user *is*
//! is established upstream; this service only needs a stable key.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Bearer-token middleware
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Read a bearer token env var and return its SHA-256 digest, or `None`
/// for dev mode. Called once during bootstrap.
pub fn token_hash_from_env(env_var: &str) -> Option<Vec<u8>> {
    match std::env::var(env_var) {
        Ok(token) if !token.trim().is_empty() => {
            Some(Sha256::digest(token.trim().as_bytes()).to_vec())
        }
        _ => {
            tracing::warn!(
                env_var = %env_var,
                "bearer token env var unset — endpoints gated by it are unauthenticated (dev mode)"
            );
            None
        }
    }
}

fn check_bearer(req: &Request<Body>, expected_hash: &[u8]) -> bool {
    let provided = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    // Hash the provided token to a fixed-length digest, then compare in
    // constant time. This avoids leaking the token length.
    let provided_hash = Sha256::digest(provided.as_bytes());
    bool::from(provided_hash.ct_eq(expected_hash))
}

/// Axum middleware enforcing the API bearer token on `/v1` routes.
pub async fn require_api_token(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let expected = match &state.api_token_hash {
        Some(h) => h,
        None => return next.run(req).await,
    };
    if !check_bearer(&req, expected) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "invalid or missing API token" })),
        )
            .into_response();
    }
    next.run(req).await
}

/// Axum middleware enforcing the admin bearer token on `/v1/admin` routes.
pub async fn require_admin_token(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let expected = match &state.admin_token_hash {
        Some(h) => h,
        None => return next.run(req).await,
    };
    if !check_bearer(&req, expected) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "invalid or missing admin token" })),
        )
            .into_response();
    }
    next.run(req).await
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// User identity extractor
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The requesting user's stable identifier, taken from `x-user-id`.
/// Rejects with 401 when the header is missing or blank.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| UserId(v.to_owned()))
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({ "error": "missing x-user-id header" })),
                )
                    .into_response()
            })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hash_for_set_var() {
        let var = "MITRA_TEST_API_TOKEN_A";
        std::env::set_var(var, "sekrit");
        let hash = token_hash_from_env(var).unwrap();
        assert_eq!(hash, Sha256::digest(b"sekrit").to_vec());
        std::env::remove_var(var);
    }

    #[test]
    fn unset_or_blank_var_means_dev_mode() {
        assert!(token_hash_from_env("MITRA_TEST_API_TOKEN_UNSET_9").is_none());
        let var = "MITRA_TEST_API_TOKEN_BLANK";
        std::env::set_var(var, "   ");
        assert!(token_hash_from_env(var).is_none());
        std::env::remove_var(var);
    }

    #[test]
    fn bearer_check_matches_exact_token() {
        let expected = Sha256::digest(b"right-token").to_vec();
        let req = Request::builder()
            .header("authorization", "Bearer right-token")
            .body(Body::empty())
            .unwrap();
        assert!(check_bearer(&req, &expected));

        let req = Request::builder()
            .header("authorization", "Bearer wrong-token")
            .body(Body::empty())
            .unwrap();
        assert!(!check_bearer(&req, &expected));

        let req = Request::builder().body(Body::empty()).unwrap();
        assert!(!check_bearer(&req, &expected));
    }
}
