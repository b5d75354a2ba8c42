//! Authentication helpers
//!
//! Implements timing-safe comparison and slash-command token verification.
//! Verification fails closed: an unset or empty configured secret denies
//! every request rather than letting any request through.

use axum::http::HeaderMap;

/// Authorization scheme prefix the chat platform sends.
pub const TOKEN_SCHEME: &str = "Token ";

/// Extract the slash-command token from the `Authorization` header.
///
/// Returns `None` when the header is absent, not valid UTF-8, or does not
/// carry the `Token ` scheme.
pub fn extract_slash_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get("authorization")?.to_str().ok()?;
    auth.strip_prefix(TOKEN_SCHEME)
        .map(|token| token.to_string())
}

/// Timing-safe string equality.
pub fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut out = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        out |= x ^ y;
    }
    out == 0
}

/// Verify a provided slash-command token against the configured secret.
///
/// Exact, case-sensitive equality with no trimming. Returns `false` when
/// the secret is unconfigured or empty.
pub fn verify_slash_token(provided: &str, configured: Option<&str>) -> bool {
    match configured {
        Some(expected) if !expected.is_empty() => timing_safe_eq(provided, expected),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_timing_safe_eq() {
        assert!(timing_safe_eq("abc", "abc"));
        assert!(!timing_safe_eq("abc", "abd"));
        assert!(!timing_safe_eq("abc", "ab"));
        assert!(!timing_safe_eq("ab", "abc"));
        assert!(timing_safe_eq("", ""));
    }

    #[test]
    fn test_verify_slash_token() {
        assert!(verify_slash_token("s3cret", Some("s3cret")));
        assert!(!verify_slash_token("s3cret", Some("other")));
        assert!(!verify_slash_token("s3cret", Some("S3CRET")));
        assert!(!verify_slash_token("s3cret", Some(" s3cret")));
        assert!(!verify_slash_token("", Some("s3cret")));
    }

    #[test]
    fn test_verify_fails_closed_when_unconfigured() {
        assert!(!verify_slash_token("anything", None));
        assert!(!verify_slash_token("anything", Some("")));
        assert!(!verify_slash_token("", None));
        assert!(!verify_slash_token("", Some("")));
    }

    #[test]
    fn test_extract_slash_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Token my-token"));
        assert_eq!(extract_slash_token(&headers), Some("my-token".to_string()));
    }

    #[test]
    fn test_extract_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer my-token"),
        );
        assert_eq!(extract_slash_token(&headers), None);
    }

    #[test]
    fn test_extract_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(extract_slash_token(&headers), None);
    }

    #[test]
    fn test_extract_preserves_token_verbatim() {
        // No trimming: a token with trailing whitespace must mismatch.
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Token my-token "),
        );
        let token = extract_slash_token(&headers).unwrap();
        assert_eq!(token, "my-token ");
        assert!(!verify_slash_token(&token, Some("my-token")));
    }
}
