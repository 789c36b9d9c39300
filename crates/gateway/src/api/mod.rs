pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod reports;
pub mod therapists;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
///
/// Routes are split into **public** (health probes), **protected**
/// (gated behind the API bearer-token middleware), and **admin**
/// (additionally gated behind the admin token).
///
/// `state` is needed to wire up the auth middleware at build time.
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready));

    let admin = Router::new()
        .route("/v1/admin/therapists", get(therapists::list_all))
        .route(
            "/v1/admin/therapists/status",
            put(therapists::bulk_update_status),
        )
        .route(
            "/v1/admin/therapists/:id/status",
            put(therapists::update_status),
        )
        .route("/v1/admin/therapists/:id", delete(therapists::delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin_token,
        ));

    let protected = Router::new()
        // Chat (core runtime)
        .route("/v1/chat", get(chat::get_chat).post(chat::post_chat))
        .route("/v1/chat/sync", get(chat::sync_chat))
        // Dashboard
        .route("/v1/dashboard", get(dashboard::get_dashboard))
        .route(
            "/v1/dashboard/tasks",
            get(dashboard::get_tasks).put(dashboard::update_tasks),
        )
        // Reports
        .route("/v1/report", get(reports::get_report))
        .route("/v1/report/csv", get(reports::get_report_csv))
        // Therapist directory
        .route(
            "/v1/therapists",
            post(therapists::create).get(therapists::list_accepted),
        )
        .merge(admin)
        // Apply API auth middleware to all protected routes.
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_api_token,
        ));

    public.merge(protected)
}
