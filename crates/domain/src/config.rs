//! Gateway configuration, loaded from `config.toml`.
//!
//! Every field has a serde default so an empty file is a valid (dev)
//! configuration. `Config::validate` reports issues with a severity so
//! the binary can warn on questionable settings and abort on fatal ones.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load a config file. A missing file yields the all-defaults config
    /// (dev mode) rather than an error.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file found, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Validate the configuration. Errors abort startup; warnings are
    /// logged and tolerated.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.generation.models.is_empty() {
            issues.push(ConfigIssue::error(
                "generation.models must list at least one model",
            ));
        }
        if self.generation.timeout_ms == 0 {
            issues.push(ConfigIssue::error("generation.timeout_ms must be > 0"));
        }
        if self.sessions.max_sessions == 0 {
            issues.push(ConfigIssue::error("sessions.max_sessions must be > 0"));
        }
        if let Some(rl) = &self.server.rate_limit {
            if rl.requests_per_second == 0 || rl.burst_size == 0 {
                issues.push(ConfigIssue::error(
                    "server.rate_limit requires requests_per_second and burst_size > 0",
                ));
            }
        }
        if self
            .server
            .cors
            .allowed_origins
            .iter()
            .any(|o| o == "*")
        {
            issues.push(ConfigIssue::warning(
                "server.cors.allowed_origins contains '*' — permissive CORS is not recommended",
            ));
        }

        issues
    }
}

/// A configuration problem found by [`Config::validate`].
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: ConfigSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Warning,
    Error,
}

impl ConfigIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_port")]
    pub port: u16,
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default)]
    pub cors: CorsConfig,
    /// Environment variable holding the API bearer token for protected
    /// endpoints. If the env var is set and non-empty, all `/v1` routes
    /// require `Authorization: Bearer <token>`. If unset, the server logs
    /// a warning and allows unauthenticated access (dev mode).
    #[serde(default = "d_api_token_env")]
    pub api_token_env: String,
    /// Environment variable holding the admin bearer token. Same dev-mode
    /// semantics as `api_token_env`, scoped to `/v1/admin` routes.
    #[serde(default = "d_admin_token_env")]
    pub admin_token_env: String,
    /// Per-IP token-bucket rate limiting. `None` (the default) disables
    /// rate limiting — suitable for local development.
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: d_port(),
            host: d_host(),
            cors: CorsConfig::default(),
            api_token_env: d_api_token_env(),
            admin_token_env: d_admin_token_env(),
            rate_limit: None,
        }
    }
}

/// Per-IP token-bucket rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Quota replenishment rate — one token every `1 / requests_per_second` seconds.
    pub requests_per_second: u64,
    /// Maximum tokens in the bucket.
    pub burst_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed for CORS. Defaults to localhost-only.
    #[serde(default = "d_cors_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: d_cors_origins(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Environment variable holding a comma-separated list of API keys.
    /// Resolved once at startup; an empty resolved list is a fatal error.
    #[serde(default = "d_api_keys_env")]
    pub api_keys_env: String,
    /// Model identifiers rotated alongside the keys.
    #[serde(default = "d_models")]
    pub models: Vec<String>,
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Deadline for one generation attempt.
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "d_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "d_temperature")]
    pub temperature: f32,
    #[serde(default = "d_top_p")]
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_keys_env: d_api_keys_env(),
            models: d_models(),
            base_url: d_base_url(),
            timeout_ms: d_timeout_ms(),
            max_output_tokens: d_max_output_tokens(),
            temperature: d_temperature(),
            top_p: d_top_p(),
        }
    }
}

impl GenerationConfig {
    /// Resolve the API key list from the configured environment variable.
    ///
    /// Keys are comma-separated; whitespace around each entry is trimmed
    /// and empty entries are dropped. An unset variable or an empty
    /// resulting list is an error — the rotator requires at least one key.
    pub fn resolve_api_keys(&self) -> Result<Vec<String>> {
        let raw = std::env::var(&self.api_keys_env).map_err(|_| {
            Error::Config(format!(
                "environment variable '{}' not set (comma-separated API key list)",
                self.api_keys_env
            ))
        })?;
        let keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .collect();
        if keys.is_empty() {
            return Err(Error::Config(format!(
                "environment variable '{}' contains no API keys",
                self.api_keys_env
            )));
        }
        Ok(keys)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sessions / storage
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Upper bound on concurrently held in-memory conversation sessions.
    /// The least-recently-touched session is evicted past this bound.
    #[serde(default = "d_max_sessions")]
    pub max_sessions: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: d_max_sessions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for the file-backed persistence sinks.
    #[serde(default = "d_state_path")]
    pub state_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_path: d_state_path(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_port() -> u16 {
    8470
}
fn d_host() -> String {
    "127.0.0.1".into()
}
fn d_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:*".into(),
        "http://127.0.0.1:*".into(),
    ]
}
fn d_api_token_env() -> String {
    "MITRA_API_TOKEN".into()
}
fn d_admin_token_env() -> String {
    "MITRA_ADMIN_TOKEN".into()
}
fn d_api_keys_env() -> String {
    "GEMINI_API_KEYS".into()
}
fn d_models() -> Vec<String> {
    vec!["gemini-2.5-flash".into(), "gemini-2.5-pro".into()]
}
fn d_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn d_timeout_ms() -> u64 {
    120_000
}
fn d_max_output_tokens() -> u32 {
    2048
}
fn d_temperature() -> f32 {
    0.7
}
fn d_top_p() -> f32 {
    0.95
}
fn d_max_sessions() -> usize {
    4096
}
fn d_state_path() -> PathBuf {
    PathBuf::from("./data")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.server.port, 8470);
        assert_eq!(cfg.generation.models.len(), 2);
        assert_eq!(cfg.generation.timeout_ms, 120_000);
        assert_eq!(cfg.sessions.max_sessions, 4096);
        assert!(cfg.server.rate_limit.is_none());
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg: Config = toml::from_str(
            r#"
            [server]
            port = 9000
            host = "0.0.0.0"

            [generation]
            models = ["gemini-2.5-flash"]
            timeout_ms = 30000

            [server.rate_limit]
            requests_per_second = 50
            burst_size = 100
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.generation.models, vec!["gemini-2.5-flash"]);
        assert_eq!(cfg.generation.timeout_ms, 30_000);
        let rl = cfg.server.rate_limit.unwrap();
        assert_eq!(rl.requests_per_second, 50);
        assert_eq!(rl.burst_size, 100);
    }

    #[test]
    fn validate_rejects_empty_model_list() {
        let cfg: Config = toml::from_str("[generation]\nmodels = []\n").unwrap();
        let issues = cfg.validate();
        assert!(issues
            .iter()
            .any(|i| i.severity == ConfigSeverity::Error && i.message.contains("models")));
    }

    #[test]
    fn validate_warns_on_wildcard_cors() {
        let cfg: Config =
            toml::from_str("[server.cors]\nallowed_origins = [\"*\"]\n").unwrap();
        let issues = cfg.validate();
        assert!(issues
            .iter()
            .any(|i| i.severity == ConfigSeverity::Warning));
    }

    #[test]
    fn default_config_validates_clean() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn resolve_api_keys_splits_and_trims() {
        let var = "MITRA_TEST_KEYS_SPLIT_1";
        std::env::set_var(var, " key-a , key-b ,, key-c");
        let gen = GenerationConfig {
            api_keys_env: var.into(),
            ..Default::default()
        };
        let keys = gen.resolve_api_keys().unwrap();
        assert_eq!(keys, vec!["key-a", "key-b", "key-c"]);
        std::env::remove_var(var);
    }

    #[test]
    fn resolve_api_keys_unset_var_is_error() {
        let gen = GenerationConfig {
            api_keys_env: "MITRA_TEST_KEYS_UNSET_99".into(),
            ..Default::default()
        };
        assert!(gen.resolve_api_keys().is_err());
    }

    #[test]
    fn resolve_api_keys_blank_var_is_error() {
        let var = "MITRA_TEST_KEYS_BLANK_1";
        std::env::set_var(var, " , ,");
        let gen = GenerationConfig {
            api_keys_env: var.into(),
            ..Default::default()
        };
        assert!(gen.resolve_api_keys().is_err());
        std::env::remove_var(var);
    }
}
