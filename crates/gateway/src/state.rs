use std::sync::Arc;

use mitra_domain::config::Config;
use mitra_providers::GenerationClient;
use mitra_sessions::SessionStore;
use mitra_storage::{Journal, MetricsRecord, ScreeningRecord, TaskStore, TherapistStore};

/// Shared application state passed to all API handlers.
///
/// Fields are grouped by concern:
/// - **Core services** — config, the rotation-aware generation client
/// - **Sessions** — in-memory conversation state
/// - **Persistence sinks** — metrics/screening journals, task lists,
///   therapist directory
/// - **Security (startup-computed)** — bearer-token digests
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub generator: Arc<GenerationClient>,

    // ── Sessions ──────────────────────────────────────────────────────
    pub sessions: Arc<SessionStore>,

    // ── Persistence sinks ─────────────────────────────────────────────
    pub metrics: Arc<Journal<MetricsRecord>>,
    pub screenings: Arc<Journal<ScreeningRecord>>,
    pub tasks: Arc<TaskStore>,
    pub therapists: Arc<TherapistStore>,

    // ── Security (startup-computed) ───────────────────────────────────
    /// SHA-256 hash of the API bearer token (read once at startup).
    /// `None` = dev mode (no auth enforced).
    pub api_token_hash: Option<Vec<u8>>,
    /// SHA-256 hash of the admin bearer token (read once at startup).
    /// `None` = dev mode (admin endpoints accessible without auth).
    pub admin_token_hash: Option<Vec<u8>>,
}
