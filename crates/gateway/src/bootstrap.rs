//! AppState construction extracted from `main.rs`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use mitra_domain::config::{Config, ConfigSeverity};
use mitra_providers::{CredentialRotator, GeminiGenerator, GenerationClient};
use mitra_sessions::SessionStore;
use mitra_storage::{Journal, TaskStore, TherapistStore};

use crate::api::auth::token_hash_from_env;
use crate::state::AppState;

/// Validate config, initialize every subsystem and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Generation client ────────────────────────────────────────────
    let api_keys = config
        .generation
        .resolve_api_keys()
        .context("resolving generation API keys")?;
    let rotator = Arc::new(
        CredentialRotator::new(api_keys, config.generation.models.clone())
            .context("building credential rotator")?,
    );
    let backend = Arc::new(
        GeminiGenerator::from_config(&config.generation)
            .context("building Gemini adapter")?,
    );
    let generator = Arc::new(GenerationClient::new(
        backend,
        rotator.clone(),
        Duration::from_millis(config.generation.timeout_ms),
    ));
    tracing::info!(
        keys = rotator.key_count(),
        models = rotator.model_count(),
        timeout_ms = config.generation.timeout_ms,
        "generation client ready"
    );

    // ── Sessions ─────────────────────────────────────────────────────
    let sessions = Arc::new(SessionStore::new(config.sessions.max_sessions));
    tracing::info!(
        max_sessions = config.sessions.max_sessions,
        "session store ready"
    );

    // ── Persistence sinks ────────────────────────────────────────────
    let state_path = &config.storage.state_path;
    let metrics = Arc::new(
        Journal::new(state_path.join("metrics")).context("initializing metrics journal")?,
    );
    let screenings = Arc::new(
        Journal::new(state_path.join("screenings"))
            .context("initializing screenings journal")?,
    );
    let tasks =
        Arc::new(TaskStore::new(state_path.join("todos")).context("initializing task store")?);
    let therapists =
        Arc::new(TherapistStore::new(state_path).context("initializing therapist store")?);
    tracing::info!(path = %state_path.display(), "persistence sinks ready");

    // ── Auth tokens (read once) ──────────────────────────────────────
    let api_token_hash = token_hash_from_env(&config.server.api_token_env);
    let admin_token_hash = token_hash_from_env(&config.server.admin_token_env);

    Ok(AppState {
        config,
        generator,
        sessions,
        metrics,
        screenings,
        tasks,
        therapists,
        api_token_hash,
        admin_token_hash,
    })
}
