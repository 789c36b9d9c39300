//! Conversation primitives: supported languages and transcript messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Languages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Languages the gateway can converse in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Hi,
    As,
}

impl Lang {
    /// Parse a BCP-47-ish tag (`"en"`, `"hi-IN"`, `"as_IN"`). Only the
    /// primary subtag is considered. Returns `None` for unsupported
    /// languages so callers can apply their own fallback chain.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Lang::En),
            "hi" => Some(Lang::Hi),
            "as" => Some(Lang::As),
            _ => None,
        }
    }

    /// The wire tag (`"en"`, `"hi"`, `"as"`).
    pub fn tag(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Hi => "hi",
            Lang::As => "as",
        }
    }

    /// English display name, used when instructing the model which
    /// language to respond in.
    pub fn display_name(&self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Hi => "Hindi",
            Lang::As => "Assamese",
        }
    }

    /// All supported languages, in catalog order.
    pub fn all() -> [Lang; 3] {
        [Lang::En, Lang::Hi, Lang::As]
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Transcript messages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Message kind. Greetings are tracked separately so a mid-session
/// language switch can re-localize them in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Chat,
    Greeting,
}

/// One entry in a conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    #[serde(default)]
    pub kind: MessageKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub language: Lang,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, language: Lang) -> Self {
        Self {
            sender: Sender::User,
            kind: MessageKind::Chat,
            text: text.into(),
            timestamp: Utc::now(),
            language,
        }
    }

    pub fn bot(text: impl Into<String>, language: Lang) -> Self {
        Self {
            sender: Sender::Bot,
            kind: MessageKind::Chat,
            text: text.into(),
            timestamp: Utc::now(),
            language,
        }
    }

    pub fn greeting(text: impl Into<String>, language: Lang) -> Self {
        Self {
            sender: Sender::Bot,
            kind: MessageKind::Greeting,
            text: text.into(),
            timestamp: Utc::now(),
            language,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_from_tag_primary_subtag() {
        assert_eq!(Lang::from_tag("en"), Some(Lang::En));
        assert_eq!(Lang::from_tag("hi-IN"), Some(Lang::Hi));
        assert_eq!(Lang::from_tag("as_IN"), Some(Lang::As));
        assert_eq!(Lang::from_tag("  HI "), Some(Lang::Hi));
    }

    #[test]
    fn lang_from_tag_unsupported() {
        assert_eq!(Lang::from_tag("fr"), None);
        assert_eq!(Lang::from_tag(""), None);
    }

    #[test]
    fn lang_serde_roundtrip() {
        let json = serde_json::to_string(&Lang::As).unwrap();
        assert_eq!(json, r#""as""#);
        let back: Lang = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Lang::As);
    }

    #[test]
    fn message_kind_defaults_to_chat() {
        let json = r#"{
            "sender": "user",
            "text": "hello",
            "timestamp": "2026-01-15T10:00:00Z",
            "language": "en"
        }"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind, MessageKind::Chat);
    }

    #[test]
    fn greeting_constructor_sets_kind() {
        let msg = ChatMessage::greeting("hello", Lang::En);
        assert_eq!(msg.sender, Sender::Bot);
        assert_eq!(msg.kind, MessageKind::Greeting);
    }
}
