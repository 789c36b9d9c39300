//! In-memory conversation session store.
//!
//! Sessions are process-lifetime state: created lazily on first chatbot
//! access, mutated by appending messages on every turn, and lost on
//! restart. The map is bounded — past `max_sessions` the
//! least-recently-touched session is evicted so a long-running process
//! cannot grow without limit.
//!
//! Concurrency: the map is guarded by a single `RwLock`. Different users
//! never contaminate each other; two in-flight turns for the *same* user
//! interleave their appends last-write-wins, which is accepted behavior
//! rather than a guarantee.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use mitra_domain::chat::{ChatMessage, Lang, MessageKind};
use mitra_domain::trace::TraceEvent;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One user's conversation state.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    pub language: Lang,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    fn new(language: Lang) -> Self {
        let now = Utc::now();
        Self {
            messages: Vec::new(),
            language,
            created_at: now,
            updated_at: now,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Bounded in-memory session map keyed by user ID.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, ChatSession>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Look up a session, cloning it out.
    pub fn get(&self, user_id: &str) -> Option<ChatSession> {
        self.sessions.read().get(user_id).cloned()
    }

    /// Resolve or create a session for the given user. Returns
    /// `(session, is_new)`.
    pub fn get_or_create(&self, user_id: &str, language: Lang) -> (ChatSession, bool) {
        // Fast path: session already exists.
        {
            let sessions = self.sessions.read();
            if let Some(session) = sessions.get(user_id) {
                return (session.clone(), false);
            }
        }

        let mut sessions = self.sessions.write();
        // Re-check under the write lock — another task may have created it.
        if let Some(session) = sessions.get(user_id) {
            return (session.clone(), false);
        }

        if sessions.len() >= self.max_sessions {
            evict_least_recent(&mut sessions);
        }

        let session = ChatSession::new(language);
        sessions.insert(user_id.to_owned(), session.clone());

        TraceEvent::SessionCreated {
            user_id: user_id.to_owned(),
            language: language.tag().to_owned(),
        }
        .emit();

        (session, true)
    }

    /// Append a message to a user's transcript. Creates the session if it
    /// does not exist (same-language as the message).
    pub fn append(&self, user_id: &str, message: ChatMessage) {
        let mut sessions = self.sessions.write();
        let session = sessions
            .entry(user_id.to_owned())
            .or_insert_with(|| ChatSession::new(message.language));
        session.messages.push(message);
        session.updated_at = Utc::now();
    }

    /// Snapshot a user's transcript (empty if no session exists).
    pub fn transcript(&self, user_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .read()
            .get(user_id)
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    /// Switch a session's language, re-localizing any greeting messages
    /// in place with the provided text.
    pub fn set_language(&self, user_id: &str, language: Lang, greeting_text: &str) {
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.get_mut(user_id) else {
            return;
        };
        if session.language == language {
            return;
        }
        let old = session.language;
        session.language = language;
        for msg in &mut session.messages {
            if msg.kind == MessageKind::Greeting {
                msg.text = greeting_text.to_owned();
                msg.language = language;
            }
        }
        session.updated_at = Utc::now();
        tracing::info!(
            user_id = %user_id,
            old_language = old.tag(),
            new_language = language.tag(),
            "session language changed"
        );
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drop the session with the oldest `updated_at`.
fn evict_least_recent(sessions: &mut HashMap<String, ChatSession>) {
    let Some((user_id, updated_at)) = sessions
        .iter()
        .min_by_key(|(_, s)| s.updated_at)
        .map(|(k, s)| (k.clone(), s.updated_at))
    else {
        return;
    };
    sessions.remove(&user_id);
    TraceEvent::SessionEvicted {
        user_id,
        idle_secs: Utc::now().signed_duration_since(updated_at).num_seconds(),
    }
    .emit();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
