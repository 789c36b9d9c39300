//! The generation client: one prompt in, text (or structured JSON) out,
//! with per-attempt timeout and fallback across the credential rotation.
//!
//! Policy: a generation step gets exactly one full rotation — one attempt
//! per configured API key, each with a fresh (key, model) pick. The first
//! success wins; when every attempt fails the step surfaces
//! [`Error::Exhausted`] carrying the last underlying failure. There is no
//! backoff and no second pass; the turn pipeline substitutes fallback
//! values instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use mitra_domain::error::{Error, Result};
use mitra_domain::trace::TraceEvent;

use crate::rotation::CredentialRotator;
use crate::traits::TextGenerator;
use crate::util::strip_code_fence;

/// Rotation-aware generation client shared by all turn steps.
pub struct GenerationClient {
    backend: Arc<dyn TextGenerator>,
    rotator: Arc<CredentialRotator>,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(
        backend: Arc<dyn TextGenerator>,
        rotator: Arc<CredentialRotator>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            rotator,
            timeout,
        }
    }

    pub fn rotator(&self) -> &CredentialRotator {
        &self.rotator
    }

    /// Generate free text, trying each credential once.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let attempts = self.rotator.key_count();
        let mut last_err: Option<Error> = None;

        for _ in 0..attempts {
            let pick = self.rotator.next();
            let start = Instant::now();
            let outcome = tokio::time::timeout(
                self.timeout,
                self.backend.generate(prompt, &pick.api_key, &pick.model),
            )
            .await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(Ok(text)) => {
                    TraceEvent::GenRequest {
                        model: pick.model,
                        key_index: pick.key_index,
                        duration_ms,
                        ok: true,
                    }
                    .emit();
                    return Ok(text);
                }
                Ok(Err(e)) => {
                    TraceEvent::GenAttemptFailed {
                        model: pick.model.clone(),
                        key_index: pick.key_index,
                        reason: e.to_string(),
                    }
                    .emit();
                    tracing::warn!(
                        model = %pick.model,
                        key_index = pick.key_index,
                        error = %e,
                        "generation attempt failed, rotating"
                    );
                    last_err = Some(e);
                }
                Err(_) => {
                    let e = Error::Timeout(format!(
                        "model '{}' exceeded {}ms deadline",
                        pick.model,
                        self.timeout.as_millis()
                    ));
                    TraceEvent::GenAttemptFailed {
                        model: pick.model.clone(),
                        key_index: pick.key_index,
                        reason: e.to_string(),
                    }
                    .emit();
                    tracing::warn!(
                        model = %pick.model,
                        key_index = pick.key_index,
                        "generation attempt timed out, rotating"
                    );
                    last_err = Some(e);
                }
            }
        }

        TraceEvent::GenExhausted { attempts }.emit();
        Err(Error::Exhausted {
            attempts,
            last: last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".into()),
        })
    }

    /// Generate and parse a structured JSON response.
    ///
    /// Models routinely wrap "strict JSON" answers in Markdown fences, so
    /// the fence is stripped before parsing. A response that still is not
    /// valid JSON is a [`Error::Parse`].
    pub async fn generate_json(&self, prompt: &str) -> Result<Value> {
        let raw = self.generate(prompt).await?;
        let cleaned = strip_code_fence(&raw);
        serde_json::from_str(&cleaned)
            .map_err(|e| Error::Parse(format!("generation output was not valid JSON: {e}")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
