//! Log Redaction
//!
//! Scrubs API keys and access tokens from provider error bodies prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9\-_]{20,})|(hf_[a-zA-Z0-9]{20,})|(AIza[0-9A-Za-z\-_]{30,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
static KEY_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([?&]key=)[^&\s]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    KEY_PARAM_RE.replace_all(&redacted, "${1}[REDACTED_TOKEN]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_bearer_and_provider_keys() {
        let raw = "401 from upstream: Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 key sk-or-v1-abcdefghijklmnopqrstuvwxyz";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(!clean.contains("abcdefghijklmnopqrstuvwxyz"));
    }

    #[test]
    fn redacts_query_string_keys() {
        let raw = "GET https://example.com/v1beta/models/x:generateContent?key=AIzaSecret123 failed";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("AIzaSecret123"));
        assert!(clean.contains("?key=[REDACTED_TOKEN]"));
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(redact_sensitive_data("model overloaded"), "model overloaded");
    }
}
