//! Round-robin credential and model rotation.
//!
//! [`CredentialRotator`] holds the resolved API key list and the model
//! list, each with its own atomic cursor. Every [`CredentialRotator::next`]
//! advances both cursors by one, wrapping independently, so keys and
//! models drift against each other when the list lengths differ.
//!
//! The rotator is `Send + Sync` and shared behind an `Arc`. Cursor
//! updates are relaxed atomics — under concurrent load the assignment of
//! keys to requests is racy, which is fine: rotation order is a
//! load-spreading heuristic, not a guarantee.

use std::sync::atomic::{AtomicUsize, Ordering};

use mitra_domain::error::{Error, Result};

/// One rotation pick: the key to authenticate with and the model to call.
#[derive(Debug, Clone)]
pub struct RotationPick {
    /// Index into the key list (for logging; the key itself is never logged).
    pub key_index: usize,
    pub api_key: String,
    pub model: String,
}

/// Thread-safe round-robin rotator over API keys and model identifiers.
pub struct CredentialRotator {
    keys: Vec<String>,
    models: Vec<String>,
    key_cursor: AtomicUsize,
    model_cursor: AtomicUsize,
}

impl CredentialRotator {
    /// Build a rotator.
    ///
    /// # Errors
    ///
    /// Fails fast with [`Error::Config`] when either list is empty — a
    /// rotator with nothing to rotate over must never be constructed.
    pub fn new(keys: Vec<String>, models: Vec<String>) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::Config(
                "credential rotator requires at least one API key".into(),
            ));
        }
        if models.is_empty() {
            return Err(Error::Config(
                "credential rotator requires at least one model".into(),
            ));
        }
        Ok(Self {
            keys,
            models,
            key_cursor: AtomicUsize::new(0),
            model_cursor: AtomicUsize::new(0),
        })
    }

    /// Return the next (key, model) pair, advancing both cursors.
    pub fn next(&self) -> RotationPick {
        let key_index = self.key_cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        let model_index = self.model_cursor.fetch_add(1, Ordering::Relaxed) % self.models.len();
        RotationPick {
            key_index,
            api_key: self.keys[key_index].clone(),
            model: self.models[model_index].clone(),
        }
    }

    /// Number of keys. One full retry rotation is this many attempts.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

// Manual Debug impl to avoid leaking key values.
impl std::fmt::Debug for CredentialRotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRotator")
            .field("key_count", &self.keys.len())
            .field("models", &self.models)
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
