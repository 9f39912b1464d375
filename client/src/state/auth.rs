//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provided once as `RwSignal<AuthState>` context by `App`. Components derive
//! an [`AuthStatus`] from it; only the session synchronizer writes to it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::net::types::{AuthView, Session, User};

/// Shown when loading finished without any view installed.
pub const NO_VIEW_MESSAGE: &str = "no authentication status available";

/// Cached session view plus whether a check is outstanding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub view: Option<AuthView>,
    pub loading: bool,
}

impl Default for AuthState {
    /// Nothing has been fetched yet, so the first render is a loading one.
    fn default() -> Self {
        Self { view: None, loading: true }
    }
}

/// What the UI should show, derived from [`AuthState`] at a point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    Loading,
    Authenticated { user: User, session: Session },
    Unauthenticated,
    Errored(String),
}

impl AuthState {
    /// Derive the status as of `now_millis`. An expired or inconsistent
    /// session counts as no session, whatever the server last said.
    pub fn status(&self, now_millis: i64) -> AuthStatus {
        if self.loading {
            return AuthStatus::Loading;
        }
        let Some(view) = &self.view else {
            return AuthStatus::Errored(NO_VIEW_MESSAGE.to_owned());
        };
        if let Some(error) = &view.error {
            return AuthStatus::Errored(error.clone());
        }
        match (&view.user, &view.session) {
            (Some(user), Some(session)) if session.user_id == user.id && !session.is_expired_at(now_millis) => {
                AuthStatus::Authenticated { user: user.clone(), session: session.clone() }
            }
            _ => AuthStatus::Unauthenticated,
        }
    }
}

/// Write access to the shared auth state.
pub trait AuthSink {
    fn apply(&self, f: impl FnOnce(&mut AuthState));
}

impl AuthSink for RwSignal<AuthState> {
    fn apply(&self, f: impl FnOnce(&mut AuthState)) {
        self.update(f);
    }
}
