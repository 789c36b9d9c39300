use serde::Serialize;

/// Structured trace events emitted across all mitra crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    GenRequest {
        model: String,
        key_index: usize,
        duration_ms: u64,
        ok: bool,
    },
    GenAttemptFailed {
        model: String,
        key_index: usize,
        reason: String,
    },
    GenExhausted {
        attempts: usize,
    },
    SessionCreated {
        user_id: String,
        language: String,
    },
    SessionEvicted {
        user_id: String,
        idle_secs: i64,
    },
    TurnCompleted {
        user_id: String,
        reply_chars: usize,
        reply_fallback: bool,
        metrics_fallback: bool,
        tasks_count: usize,
        tasks_fallback: bool,
        duration_ms: u64,
    },
    RecordPersisted {
        kind: String,
        user_id: String,
        fallback: bool,
    },
    TherapistStatusChanged {
        therapist_id: String,
        status: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "mitra_event");
    }
}
