//! Shared test fixtures: a scripted generation backend and a fully wired
//! [`AppState`] over temp-dir storage.

use std::sync::Arc;
use std::time::Duration;

use mitra_domain::config::Config;
use mitra_domain::error::{Error, Result};
use mitra_providers::{CredentialRotator, GenerationClient, TextGenerator};
use mitra_sessions::SessionStore;
use mitra_storage::{Journal, TaskStore, TherapistStore};

use crate::state::AppState;

/// Scripted backend: routes each prompt kind to a canned response.
/// `None` simulates a provider failure for that step.
pub(crate) struct ScriptedBackend {
    pub reply: Option<String>,
    pub metrics: Option<String>,
    pub tasks: Option<String>,
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedBackend {
    async fn generate(&self, prompt: &str, _api_key: &str, _model: &str) -> Result<String> {
        let slot = if prompt.contains("wellness assistant") {
            &self.tasks
        } else if prompt.contains("strict JSON format with exact keys") {
            &self.metrics
        } else {
            &self.reply
        };
        slot.clone().ok_or(Error::Provider {
            provider: "mock".into(),
            message: "HTTP 500 - scripted failure".into(),
        })
    }
}

/// Backend whose three steps all succeed with plausible output.
pub(crate) fn happy_backend() -> ScriptedBackend {
    ScriptedBackend {
        reply: Some("That sounds really hard. What happened today?".into()),
        metrics: Some(
            r#"```json
{
  "metrics": {"stress_level": 80, "happiness_level": 10, "anxiety_level": 35, "overall_mood_level": 18},
  "screening": {"phq9_score": 12, "gad7_score": 9, "ghq_score": 40, "risk_level": "moderate"}
}
```"#
                .into(),
        ),
        tasks: Some(
            r#"{"todos": [
                {"title": "Breathe for 5 minutes", "priority": "high", "category": "mindfulness"},
                {"title": "Call a friend", "priority": "medium", "category": "social"},
                {"title": "Go for a run", "priority": "low", "category": "physical"}
            ]}"#
            .into(),
        ),
    }
}

/// Backend where every generation step fails.
pub(crate) fn failing_backend() -> ScriptedBackend {
    ScriptedBackend {
        reply: None,
        metrics: None,
        tasks: None,
    }
}

/// A dev-mode [`AppState`] over the given temp dir and backend.
pub(crate) fn test_state(dir: &std::path::Path, backend: ScriptedBackend) -> AppState {
    let rotator = Arc::new(
        CredentialRotator::new(
            vec!["key-a".into(), "key-b".into()],
            vec!["model-x".into()],
        )
        .unwrap(),
    );
    AppState {
        config: Arc::new(Config::default()),
        generator: Arc::new(GenerationClient::new(
            Arc::new(backend),
            rotator,
            Duration::from_secs(5),
        )),
        sessions: Arc::new(SessionStore::new(64)),
        metrics: Arc::new(Journal::new(dir.join("metrics")).unwrap()),
        screenings: Arc::new(Journal::new(dir.join("screenings")).unwrap()),
        tasks: Arc::new(TaskStore::new(dir.join("todos")).unwrap()),
        therapists: Arc::new(TherapistStore::new(dir).unwrap()),
        api_token_hash: None,
        admin_token_hash: None,
    }
}
