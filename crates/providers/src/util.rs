//! Shared helpers for the generation layer.

use mitra_domain::error::Error;

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`].
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// Strip a Markdown code fence (```json ... ``` or bare ``` ... ```)
/// from model output so the remainder can be parsed as JSON.
///
/// Empty or whitespace-only input yields `"{}"` so downstream parsing
/// fails with a missing-keys shape rather than a syntax error.
pub fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "{}".to_string();
    }
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let without_close = without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open);
    without_close.trim().to_string()
}

/// Redact the `key=` query parameter from a URL for safe logging.
pub(crate) fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(raw), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(raw), "{\"a\": 1}");
    }

    #[test]
    fn unfenced_input_passes_through() {
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn empty_input_becomes_empty_object() {
        assert_eq!(strip_code_fence(""), "{}");
        assert_eq!(strip_code_fence("   \n"), "{}");
    }

    #[test]
    fn unterminated_fence_still_strips_opening() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn redacts_key_query_param() {
        assert_eq!(
            redact_url_key("https://x.test/v1?key=sekrit&alt=sse"),
            "https://x.test/v1?key=[REDACTED]&alt=sse"
        );
        assert_eq!(
            redact_url_key("https://x.test/v1?key=sekrit"),
            "https://x.test/v1?key=[REDACTED]"
        );
        assert_eq!(redact_url_key("https://x.test/v1"), "https://x.test/v1");
    }
}
