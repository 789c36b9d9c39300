//! The turn orchestrator.
//!
//! One turn = one user message in, and out: a conversational reply, a
//! metrics/screening extraction, and a refreshed task list. The reply
//! runs concurrently with the metrics→tasks chain (tasks consume the
//! extraction output, so those two stay sequential).
//!
//! Failure semantics: a failed reply degrades to a canned localized
//! apology; failed extraction or task generation is absorbed entirely and
//! replaced with defaults. Metrics and screening records are persisted
//! even when they hold fallback values — a session never goes without a
//! data point — but such records carry `fallback = true` so trend
//! analysis can set them aside. A turn itself never fails.

use std::time::Instant;

use serde_json::Value;

use mitra_domain::chat::{ChatMessage, Lang};
use mitra_domain::trace::TraceEvent;
use mitra_domain::wellness::{MetricsSample, ScreeningSample, TaskItem};
use mitra_storage::{MetricsRecord, ScreeningRecord};

use crate::i18n;
use crate::state::AppState;

use super::prompts;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Input / output
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Input to a single turn.
pub struct TurnInput {
    pub user_id: String,
    pub message: String,
    pub language: Lang,
}

/// Everything a turn produced.
pub struct TurnOutcome {
    pub bot_reply: String,
    pub reply_fallback: bool,
    /// The full updated transcript.
    pub messages: Vec<ChatMessage>,
    pub metrics: MetricsSample,
    pub screening: ScreeningSample,
    pub metrics_fallback: bool,
    pub tasks: Vec<TaskItem>,
    pub tasks_fallback: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// run_turn — the core orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run one conversational turn for a user.
pub async fn run_turn(state: &AppState, input: TurnInput) -> TurnOutcome {
    let start = Instant::now();

    // 1. Append the user's message before anything else so both
    //    generation branches see the same transcript.
    state
        .sessions
        .get_or_create(&input.user_id, input.language);
    state.sessions.append(
        &input.user_id,
        ChatMessage::user(input.message.clone(), input.language),
    );
    let history = state.sessions.transcript(&input.user_id);

    // 2. Reply and the metrics→tasks chain are independent; run them
    //    concurrently and join before responding.
    let reply_branch = generate_reply(state, &history, &input.message, input.language);
    let wellness_branch = generate_wellness(state, &input.message, input.language);
    let ((bot_reply, reply_fallback), wellness) = tokio::join!(reply_branch, wellness_branch);

    // 3. The reply (real or canned) joins the transcript either way.
    state.sessions.append(
        &input.user_id,
        ChatMessage::bot(bot_reply.clone(), input.language),
    );

    // 4. Persist unconditionally; storage failures are an operator
    //    problem, never a user-facing one.
    persist(state, &input, &wellness).await;

    let messages = state.sessions.transcript(&input.user_id);

    TraceEvent::TurnCompleted {
        user_id: input.user_id.clone(),
        reply_chars: bot_reply.chars().count(),
        reply_fallback,
        metrics_fallback: wellness.metrics_fallback,
        tasks_count: wellness.tasks.len(),
        tasks_fallback: wellness.tasks_fallback,
        duration_ms: start.elapsed().as_millis() as u64,
    }
    .emit();

    TurnOutcome {
        bot_reply,
        reply_fallback,
        messages,
        metrics: wellness.metrics,
        screening: wellness.screening,
        metrics_fallback: wellness.metrics_fallback,
        tasks: wellness.tasks,
        tasks_fallback: wellness.tasks_fallback,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Generation branches
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Reply generation. Returns `(text, was_fallback)`.
async fn generate_reply(
    state: &AppState,
    history: &[ChatMessage],
    message: &str,
    lang: Lang,
) -> (String, bool) {
    let prompt = prompts::reply_prompt(history, message, lang);
    match state.generator.generate(&prompt).await {
        Ok(text) => (text.trim().to_owned(), false),
        Err(e) => {
            tracing::error!(
                error = %e,
                "reply generation failed, serving canned apology"
            );
            (i18n::generation_error(lang).to_owned(), true)
        }
    }
}

struct WellnessOutcome {
    metrics: MetricsSample,
    screening: ScreeningSample,
    metrics_fallback: bool,
    tasks: Vec<TaskItem>,
    tasks_fallback: bool,
}

/// The metrics→tasks chain. Both steps absorb every failure.
async fn generate_wellness(state: &AppState, message: &str, lang: Lang) -> WellnessOutcome {
    let (metrics, screening, metrics_fallback) =
        match state.generator.generate_json(&prompts::metrics_prompt(message)).await {
            Ok(parsed) => {
                let metrics =
                    MetricsSample::from_json(parsed.get("metrics").unwrap_or(&Value::Null));
                let screening =
                    ScreeningSample::from_json(parsed.get("screening").unwrap_or(&Value::Null));
                (metrics, screening, false)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "metrics extraction failed, recording zeroed fallback sample"
                );
                (MetricsSample::default(), ScreeningSample::default(), true)
            }
        };

    // Tasks see the extraction output, fallback or not.
    let task_prompt = prompts::tasks_prompt(message, &metrics, &screening, lang);
    let (tasks, tasks_fallback) = match state.generator.generate_json(&task_prompt).await {
        Ok(parsed) => (TaskItem::list_from_json(&parsed), false),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "task generation failed, substituting canned tasks"
            );
            (i18n::fallback_tasks(lang), true)
        }
    };

    WellnessOutcome {
        metrics,
        screening,
        metrics_fallback,
        tasks,
        tasks_fallback,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Persistence
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn persist(state: &AppState, input: &TurnInput, wellness: &WellnessOutcome) {
    let metrics_record = MetricsRecord::new(
        &input.user_id,
        &input.message,
        wellness.metrics,
        wellness.metrics_fallback,
    );
    match state
        .metrics
        .append_async(&input.user_id, metrics_record)
        .await
    {
        Ok(()) => TraceEvent::RecordPersisted {
            kind: "metrics".into(),
            user_id: input.user_id.clone(),
            fallback: wellness.metrics_fallback,
        }
        .emit(),
        Err(e) => tracing::error!(error = %e, "persisting metrics record failed"),
    }

    let screening_record = ScreeningRecord::new(
        &input.user_id,
        &input.message,
        wellness.screening,
        wellness.metrics_fallback,
    );
    match state
        .screenings
        .append_async(&input.user_id, screening_record)
        .await
    {
        Ok(()) => TraceEvent::RecordPersisted {
            kind: "screening".into(),
            user_id: input.user_id.clone(),
            fallback: wellness.metrics_fallback,
        }
        .emit(),
        Err(e) => tracing::error!(error = %e, "persisting screening record failed"),
    }

    if let Err(e) = state
        .tasks
        .upsert(&input.user_id, wellness.tasks.clone(), input.language)
    {
        tracing::error!(error = %e, "persisting task list failed");
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
