/// Shared error type used across all mitra crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("empty response: {0}")]
    EmptyResponse(String),

    #[error("parse: {0}")]
    Parse(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("all credentials exhausted after {attempts} attempt(s): {last}")]
    Exhausted { attempts: usize, last: String },

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid: {0}")]
    Invalid(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
