//! Session tokens and the cookies that carry them.
//!
//! ARCHITECTURE
//! ============
//! The store keys sessions by an opaque random token. The browser never sees
//! the bare token: the `session_token` cookie holds `token.signature`, where
//! the signature is an HMAC-SHA256 of the token under the configured secret.
//! A cookie that fails verification is treated exactly like no cookie.
//!
//! TRADE-OFFS
//! ==========
//! Signing adds a verification step before every store lookup, so forged or
//! truncated cookies never reach the datastore.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use time::Duration;

pub const SESSION_COOKIE: &str = "session_token";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
pub const OAUTH_STATE_TTL: Duration = Duration::minutes(10);

type HmacSha256 = Hmac<Sha256>;

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Generate a 16-byte hex OAuth `state` value.
#[must_use]
pub fn generate_oauth_state() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

fn mac(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length")
}

/// Produce the cookie value `token.signature`.
#[must_use]
pub fn sign_token(secret: &str, token: &str) -> String {
    let mut mac = mac(secret);
    mac.update(token.as_bytes());
    format!("{token}.{}", hex::encode(mac.finalize().into_bytes()))
}

/// Recover the bare token from a signed cookie value.
#[must_use]
pub fn verify_token(secret: &str, signed: &str) -> Option<String> {
    let (token, signature) = signed.rsplit_once('.')?;
    if token.is_empty() {
        return None;
    }
    let signature = hex::decode(signature).ok()?;
    let mut mac = mac(secret);
    mac.update(token.as_bytes());
    mac.verify_slice(&signature).ok()?;
    Some(token.to_owned())
}

/// Verified session token from the request's `Cookie` header, if any.
#[must_use]
pub fn token_from_headers(secret: &str, headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    let signed = jar.get(SESSION_COOKIE)?.value();
    verify_token(secret, signed)
}

/// Raw `oauth_state` cookie value from the request, if any.
#[must_use]
pub fn oauth_state_from_headers(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(OAUTH_STATE_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// COOKIE BUILDERS
// =============================================================================

fn base_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

#[must_use]
pub fn session_cookie(signed: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(SESSION_COOKIE, signed, secure);
    cookie.set_max_age(ttl);
    cookie
}

#[must_use]
pub fn oauth_state_cookie(state: String, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(OAUTH_STATE_COOKIE, state, secure);
    cookie.set_max_age(OAUTH_STATE_TTL);
    cookie
}

/// An expired, empty cookie that makes the browser drop `name`.
#[must_use]
pub fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(name, String::new(), secure);
    cookie.set_max_age(Duration::ZERO);
    cookie
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
