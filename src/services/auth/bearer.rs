//! `Authorization: Bearer <token>` parsing.
//!
//! Accepted: `Bearer abc`, `bearer   abc`, `  BEARER abc  `.
//! Rejected (returns `None`): no header, non-ASCII header value, empty value,
//! `Bearer` without a token, any other scheme (`Basic xyz`).

use axum::http::{HeaderMap, header};

/// Token from the `Authorization` header; header name lookup is case-insensitive.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    parse_bearer(value)
}

fn parse_bearer(value: &str) -> Option<&str> {
    let (scheme, rest) = value.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn rejects_absent_and_malformed_values() {
        assert_eq!(parse_bearer(""), None);
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer    "), None);
        assert_eq!(parse_bearer("Basic xyz"), None);
        assert_eq!(parse_bearer("Bearerabc"), None);
    }

    #[test]
    fn accepts_any_case_and_extra_whitespace() {
        assert_eq!(parse_bearer("bearer   abc123"), Some("abc123"));
        assert_eq!(parse_bearer("BEARER abc123"), Some("abc123"));
        assert_eq!(parse_bearer("  Bearer\tabc123  "), Some("abc123"));
    }

    #[test]
    fn reads_the_authorization_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer t0k3n"));
        assert_eq!(extract_bearer_token(&headers), Some("t0k3n"));
    }
}
