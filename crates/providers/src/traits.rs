use mitra_domain::error::Result;

/// Trait for one-shot text generation backends.
///
/// Implementations are provider-specific HTTP adapters. The single real
/// adapter is [`crate::GeminiGenerator`]; tests substitute mocks to
/// exercise the rotation and fallback paths without network access.
///
/// A call is exactly one outbound request — retry, rotation, and timeout
/// policy live in [`crate::GenerationClient`], not here.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate free text for `prompt` using the given credential and
    /// model identifier.
    async fn generate(&self, prompt: &str, api_key: &str, model: &str) -> Result<String>;
}
