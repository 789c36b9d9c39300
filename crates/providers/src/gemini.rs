//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` API. Auth is via an API key
//! passed as a query parameter (`key={api_key}`); the key is supplied
//! per call by the rotation layer rather than held by the adapter.

use serde_json::Value;

use mitra_domain::config::GenerationConfig;
use mitra_domain::error::{Error, Result};

use crate::traits::TextGenerator;
use crate::util::{from_reqwest, redact_url_key};

/// A text generation adapter for the Google Gemini API.
pub struct GeminiGenerator {
    base_url: String,
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    client: reqwest::Client,
}

impl GeminiGenerator {
    /// Create a new adapter from the generation config.
    ///
    /// The reqwest client carries its own transport-level timeout as a
    /// backstop; the per-attempt deadline is enforced by the caller.
    pub fn from_config(cfg: &GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            max_output_tokens: cfg.max_output_tokens,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            client,
        })
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn generate_url(&self, model: &str, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, api_key
        )
    }

    fn build_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}],
            }],
            "generationConfig": {
                "maxOutputTokens": self.max_output_tokens,
                "temperature": self.temperature,
                "topP": self.top_p,
            },
        })
    }
}

/// Pull the concatenated candidate text out of a `generateContent` response.
fn parse_generate_response(body: &Value) -> Result<String> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: "gemini".into(),
            message: "no candidates in response".into(),
        })?;

    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array());

    let mut text = String::new();
    if let Some(parts) = parts {
        for part in parts {
            if let Some(t) = part.get("text").and_then(|v| v.as_str()) {
                text.push_str(t);
            }
        }
    }

    if text.trim().is_empty() {
        return Err(Error::EmptyResponse(
            "candidate contained no text parts".into(),
        ));
    }
    Ok(text)
}

#[async_trait::async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str, api_key: &str, model: &str) -> Result<String> {
        let url = self.generate_url(model, api_key);
        let body = self.build_body(prompt);

        tracing::debug!(model = %model, url = %redact_url_key(&url), "gemini generate request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Provider {
                provider: "gemini".into(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_generate_response(&resp_json)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_candidate_text() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "Hello "}, {"text": "there"}]
                },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(parse_generate_response(&body).unwrap(), "Hello there");
    }

    #[test]
    fn missing_candidates_is_provider_error() {
        let err = parse_generate_response(&json!({})).unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
    }

    #[test]
    fn empty_parts_is_empty_response_error() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{"text": "  "}] } }]
        });
        let err = parse_generate_response(&body).unwrap_err();
        assert!(matches!(err, Error::EmptyResponse(_)));
    }

    #[test]
    fn body_carries_generation_config() {
        let gen = GeminiGenerator::from_config(&GenerationConfig::default()).unwrap();
        let body = gen.build_body("hi");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn url_embeds_model_and_key() {
        let gen = GeminiGenerator::from_config(&GenerationConfig::default()).unwrap();
        let url = gen.generate_url("gemini-2.5-flash", "k123");
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=k123"
        );
    }
}
