//! Shared domain types for the mitra gateway: chat messages, wellness
//! samples, therapist directory entries, configuration, errors, and
//! structured trace events.

pub mod chat;
pub mod config;
pub mod error;
pub mod therapist;
pub mod trace;
pub mod wellness;

pub use chat::{ChatMessage, Lang, MessageKind, Sender};
pub use error::{Error, Result};
