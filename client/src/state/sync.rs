//! Session synchronizer: the client's state machine for "who is logged in".
//!
//! DESIGN
//! ======
//! Every revalidation is a full, cache-busting fetch of the session endpoint;
//! the server is the only source of truth and the installed view is a cache.
//! On success the previous view is cleared, then the new one is installed on
//! the next tick, so observers always see a transition even when the old and
//! new views are equal.
//!
//! TRADE-OFFS
//! ==========
//! Triggers are neither coalesced nor sequenced. Overlapping checks each
//! install their own response, and whichever response arrives last wins.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use crate::net::api::{SIGN_OUT_ENDPOINT, session_endpoint, sign_in_endpoint};
use crate::net::types::{AuthView, Provider};
use crate::state::auth::AuthSink;

/// Browser capabilities the synchronizer needs.
#[async_trait::async_trait(?Send)]
pub trait SessionTransport {
    /// GET `url` with caching disabled and decode the session body.
    async fn fetch_auth_view(&self, url: &str) -> Result<AuthView, String>;

    async fn sign_out(&self, url: &str) -> Result<(), String>;

    /// Resolve on the next scheduler turn.
    async fn next_tick(&self);

    /// Full-page navigation.
    fn navigate(&self, url: &str);

    fn now_millis(&self) -> i64;

    /// Tell other tabs that the session changed.
    fn broadcast_change(&self);
}

/// Events that make the cached view untrustworthy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevalidationTrigger {
    Mount,
    Focus,
    Storage,
}

#[derive(Clone, Copy, Debug)]
pub struct SessionSync<T, S> {
    transport: T,
    sink: S,
}

impl<T: SessionTransport, S: AuthSink> SessionSync<T, S> {
    pub fn new(transport: T, sink: S) -> Self {
        Self { transport, sink }
    }

    /// Fetch the session and replace the cached view.
    pub async fn check_auth(&self) {
        self.sink.apply(|s| s.loading = true);
        let url = session_endpoint(self.transport.now_millis());

        match self.transport.fetch_auth_view(&url).await {
            Ok(view) => {
                self.sink.apply(|s| s.view = None);
                self.transport.next_tick().await;
                self.sink.apply(|s| {
                    s.view = Some(view);
                    s.loading = false;
                });
            }
            Err(message) => {
                log::warn!("session check failed: {message}");
                self.sink.apply(|s| {
                    s.view = Some(AuthView::failed(message));
                    s.loading = false;
                });
            }
        }
    }

    pub async fn revalidate(&self, trigger: RevalidationTrigger) {
        log::debug!("revalidating session: {trigger:?}");
        self.check_auth().await;
    }

    /// Sign out, then re-check. The re-check runs even if the request failed.
    pub async fn sign_out(&self) {
        self.sink.apply(|s| s.loading = true);
        match self.transport.sign_out(SIGN_OUT_ENDPOINT).await {
            Ok(()) => self.transport.broadcast_change(),
            Err(e) => log::warn!("sign-out request failed: {e}"),
        }
        self.check_auth().await;
    }

    /// Leave the page for the provider's sign-in flow.
    pub fn login(&self, provider: Provider) {
        self.transport.navigate(&sign_in_endpoint(provider));
    }
}
