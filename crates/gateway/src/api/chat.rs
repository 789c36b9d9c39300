//! Chat API endpoints — the conversational surface of the gateway.
//!
//! - `GET  /v1/chat`      — fetch/create the session, localized greeting
//! - `GET  /v1/chat/sync` — poll the current transcript (no side effects)
//! - `POST /v1/chat`      — submit a message, run a full turn

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use serde::Deserialize;

use mitra_domain::chat::ChatMessage;

use crate::api::auth::UserId;
use crate::i18n;
use crate::runtime::{run_turn, TurnInput};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    /// Explicit language override (`en`, `hi`, `as`).
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostChatRequest {
    pub message: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_chat(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<LangQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let session_lang = state.sessions.get(&user_id).map(|s| s.language);
    let lang = i18n::resolve_lang(query.lang.as_deref(), session_lang, &headers);

    let (_, is_new) = state.sessions.get_or_create(&user_id, lang);
    if is_new {
        tracing::info!(user_id = %user_id, language = lang.tag(), "new chat session");
    }

    // A language switch re-localizes the stored greeting in place.
    state
        .sessions
        .set_language(&user_id, lang, i18n::greeting(lang));

    // First visit: open with the localized greeting.
    if state.sessions.transcript(&user_id).is_empty() {
        state
            .sessions
            .append(&user_id, ChatMessage::greeting(i18n::greeting(lang), lang));
    }

    Json(serde_json::json!({
        "messages": state.sessions.transcript(&user_id),
        "session_id": user_id,
        "language": lang,
        "suggestions": i18n::suggestions(lang),
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/chat/sync
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Transcript poll. Deliberately side-effect free: no session creation,
/// no greeting, no language switch — two syncs in a row always return
/// the same transcript.
pub async fn sync_chat(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "messages": state.sessions.transcript(&user_id),
        "session_id": user_id,
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn post_chat(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<LangQuery>,
    headers: HeaderMap,
    Json(body): Json<PostChatRequest>,
) -> impl IntoResponse {
    let session_lang = state.sessions.get(&user_id).map(|s| s.language);
    let lang = i18n::resolve_lang(query.lang.as_deref(), session_lang, &headers);

    let message = body.message.trim().to_owned();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": i18n::empty_message(lang) })),
        )
            .into_response();
    }

    tracing::info!(
        user_id = %user_id,
        message_chars = message.chars().count(),
        language = lang.tag(),
        "chat message received"
    );

    let outcome = run_turn(
        &state,
        TurnInput {
            user_id: user_id.clone(),
            message,
            language: lang,
        },
    )
    .await;

    let mut metrics = serde_json::to_value(outcome.metrics).unwrap_or_default();
    if let Some(obj) = metrics.as_object_mut() {
        obj.insert("labels".into(), i18n::metric_labels(lang));
    }

    let todos_message = if outcome.tasks.is_empty() {
        i18n::todos_none(lang)
    } else {
        i18n::todos_generated(lang)
    };

    Json(serde_json::json!({
        "bot_response": outcome.bot_reply,
        "messages": outcome.messages,
        "metrics": metrics,
        "screening": outcome.screening,
        "todos": {
            "data": outcome.tasks,
            "message": todos_message,
            "labels": i18n::todo_labels(lang),
        },
        "session_id": user_id,
        "language": lang,
    }))
    .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
