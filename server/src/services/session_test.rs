use super::*;
use axum::http::header::COOKIE;
use axum::http::HeaderValue;

fn headers_with_cookie(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(raw).unwrap());
    headers
}

// =============================================================================
// generate_token / generate_oauth_state
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

#[test]
fn generate_oauth_state_is_32_hex_chars() {
    let state = generate_oauth_state();
    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
}

// =============================================================================
// sign_token / verify_token
// =============================================================================

#[test]
fn signed_token_verifies_under_same_secret() {
    let signed = sign_token("s3cret", "abc123");
    assert!(signed.starts_with("abc123."));
    assert_eq!(verify_token("s3cret", &signed).as_deref(), Some("abc123"));
}

#[test]
fn signed_token_fails_under_other_secret() {
    let signed = sign_token("s3cret", "abc123");
    assert!(verify_token("other", &signed).is_none());
}

#[test]
fn tampered_token_fails() {
    let signed = sign_token("s3cret", "abc123");
    let tampered = signed.replacen("abc123", "abc124", 1);
    assert!(verify_token("s3cret", &tampered).is_none());
}

#[test]
fn unsigned_and_malformed_values_fail() {
    assert!(verify_token("s3cret", "abc123").is_none());
    assert!(verify_token("s3cret", "abc123.zz").is_none());
    assert!(verify_token("s3cret", ".deadbeef").is_none());
    assert!(verify_token("s3cret", "").is_none());
}

// =============================================================================
// Header extraction
// =============================================================================

#[test]
fn token_from_headers_reads_session_cookie() {
    let signed = sign_token("k", "tok");
    let headers = headers_with_cookie(&format!("theme=dark; {SESSION_COOKIE}={signed}"));
    assert_eq!(token_from_headers("k", &headers).as_deref(), Some("tok"));
}

#[test]
fn token_from_headers_without_cookie_is_none() {
    assert!(token_from_headers("k", &HeaderMap::new()).is_none());
    assert!(token_from_headers("k", &headers_with_cookie("theme=dark")).is_none());
}

#[test]
fn oauth_state_from_headers_ignores_empty_value() {
    assert_eq!(
        oauth_state_from_headers(&headers_with_cookie("oauth_state=xyz")).as_deref(),
        Some("xyz")
    );
    assert!(oauth_state_from_headers(&headers_with_cookie("oauth_state=")).is_none());
}

// =============================================================================
// Cookie builders
// =============================================================================

#[test]
fn session_cookie_attributes() {
    let cookie = session_cookie("v".into(), Duration::days(7), true);
    assert_eq!(cookie.name(), SESSION_COOKIE);
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.max_age(), Some(Duration::days(7)));
}

#[test]
fn oauth_state_cookie_is_short_lived() {
    let cookie = oauth_state_cookie("st".into(), false);
    assert_eq!(cookie.max_age(), Some(OAUTH_STATE_TTL));
    assert_eq!(cookie.secure(), Some(false));
}

#[test]
fn removal_cookie_expires_immediately() {
    let cookie = removal_cookie(SESSION_COOKIE, false);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}
