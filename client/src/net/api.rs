//! Auth endpoints and the browser transport.
//!
//! Endpoint builders are plain functions so they compile and test natively.
//! `BrowserTransport` (feature `csr`) performs the real requests via
//! `gloo-net` and talks to `window` for navigation and cross-tab signalling.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures come back as `String` messages. The synchronizer turns
//! them into an errored view instead of leaving the UI loading.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::Provider;

pub const SESSION_ENDPOINT: &str = "/api/auth/session";
pub const SIGN_OUT_ENDPOINT: &str = "/api/auth/sign-out";

/// Request headers that keep browsers and proxies from serving a stale session.
pub const NO_CACHE_HEADERS: [(&str, &str); 2] = [("Cache-Control", "no-cache"), ("Pragma", "no-cache")];

/// `localStorage` key written on sign-out; other tabs see a `storage` event.
pub const SESSION_CHANGED_KEY: &str = "auth:session-changed";

/// Session endpoint with a cache-busting timestamp.
pub fn session_endpoint(timestamp_millis: i64) -> String {
    format!("{SESSION_ENDPOINT}?t={timestamp_millis}")
}

pub fn sign_in_endpoint(provider: Provider) -> String {
    format!("/api/auth/sign-in/{}", provider.as_str())
}

#[cfg(any(test, feature = "csr"))]
fn session_request_failed_message(status: u16) -> String {
    format!("session request failed: {status}")
}

/// Sign-out answers with a redirect; a direct 2xx is also accepted. Anything
/// else (the server's 500 `{error, details}`) is a failure.
#[cfg(any(test, feature = "csr"))]
fn sign_out_succeeded(status: u16, redirected: bool) -> bool {
    redirected || (200..300).contains(&status)
}

#[cfg(any(test, feature = "csr"))]
fn sign_out_failed_message(status: u16) -> String {
    format!("sign-out failed: {status}")
}

/// Wall-clock time in Unix milliseconds.
pub fn now_millis() -> i64 {
    #[cfg(feature = "csr")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let now = js_sys::Date::now() as i64;
        now
    }
    #[cfg(not(feature = "csr"))]
    {
        i64::try_from(time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
    }
}

// =============================================================================
// BROWSER TRANSPORT
// =============================================================================

#[cfg(feature = "csr")]
pub use browser::BrowserTransport;

#[cfg(feature = "csr")]
mod browser {
    use web_sys::{RequestCache, RequestCredentials};

    use super::{
        NO_CACHE_HEADERS, SESSION_CHANGED_KEY, now_millis, session_request_failed_message, sign_out_failed_message,
        sign_out_succeeded,
    };
    use crate::net::types::AuthView;
    use crate::state::sync::SessionTransport;

    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserTransport;

    #[async_trait::async_trait(?Send)]
    impl SessionTransport for BrowserTransport {
        async fn fetch_auth_view(&self, url: &str) -> Result<AuthView, String> {
            let mut request = gloo_net::http::Request::get(url)
                .cache(RequestCache::NoCache)
                .credentials(RequestCredentials::Include);
            for (name, value) in NO_CACHE_HEADERS {
                request = request.header(name, value);
            }
            let resp = request.send().await.map_err(|e| e.to_string())?;
            let status = resp.status();
            resp.json::<AuthView>().await.map_err(|e| {
                if status >= 400 {
                    session_request_failed_message(status)
                } else {
                    e.to_string()
                }
            })
        }

        async fn sign_out(&self, url: &str) -> Result<(), String> {
            let resp = gloo_net::http::Request::get(url)
                .credentials(RequestCredentials::Include)
                .send()
                .await
                .map_err(|e| e.to_string())?;
            let status = resp.status();
            if sign_out_succeeded(status, resp.redirected()) {
                Ok(())
            } else {
                Err(sign_out_failed_message(status))
            }
        }

        async fn next_tick(&self) {
            gloo_timers::future::TimeoutFuture::new(0).await;
        }

        fn navigate(&self, url: &str) {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.location().set_href(url) {
                    log::error!("navigation to {url} failed: {e:?}");
                }
            }
        }

        fn now_millis(&self) -> i64 {
            now_millis()
        }

        fn broadcast_change(&self) {
            if let Some(window) = web_sys::window() {
                if let Ok(Some(storage)) = window.local_storage() {
                    let _ = storage.set_item(SESSION_CHANGED_KEY, &now_millis().to_string());
                }
            }
        }
    }
}
