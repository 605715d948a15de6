//! Log Redaction
//!
//! Scrubs API keys and tokens from strings before they are logged or echoed
//! back to callers. Backend error messages can embed request URLs, and the
//! Gemini key travels as a `key=` query parameter.

use regex::Regex;
use std::sync::LazyLock;

static QUERY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([?&](?:key|api_key)=)[^&\s)]+").unwrap());
static HEADER_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(xi-api-key\W+)[A-Za-z0-9_\-]+").unwrap());
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk_[a-zA-Z0-9]{20,})|(sk-[a-zA-Z0-9]{32,})|(AIza[0-9A-Za-z_\-]{30,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = QUERY_KEY_RE.replace_all(input, "${1}[REDACTED]");
    let redacted = HEADER_KEY_RE.replace_all(&redacted, "${1}[REDACTED]");
    API_KEY_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_gemini_key_from_url() {
        let raw = "error sending request for url (https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=secret123)";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("secret123"));
        assert!(clean.contains("?key=[REDACTED]"));
    }

    #[test]
    fn strips_bearer_and_long_keys() {
        let raw = "Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 and AIzaSyA1234567890abcdefghijklmnopqrstu";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGci"));
        assert!(!clean.contains("AIzaSyA"));
    }

    #[test]
    fn strips_xi_api_key_header() {
        let clean = redact_sensitive_data("xi-api-key: abcdef123456");
        assert!(!clean.contains("abcdef123456"));
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(redact_sensitive_data("voice not found"), "voice not found");
    }
}
