//! Wire types for `/api/auth/session`.
//!
//! DESIGN
//! ======
//! These mirror the server's session body field for field. The client never
//! builds them itself except for the errored view, so decoding is lenient:
//! missing `user`/`session` keys read as null.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Expiry as Unix milliseconds, saturating at the `i64` range.
    pub fn expires_at_millis(&self) -> i64 {
        i64::try_from(self.expires_at.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
    }

    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        self.expires_at_millis() <= now_millis
    }
}

/// The client's cached belief about the current session. Not authoritative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthView {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthView {
    /// Null user and session carrying `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self { user: None, session: None, error: Some(message.into()) }
    }
}

/// Social sign-in providers offered by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
    GitHub,
}

impl Provider {
    pub const ALL: [Self; 2] = [Self::Google, Self::GitHub];

    /// Path segment used by `/api/auth/sign-in/{provider}`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::GitHub => "GitHub",
        }
    }
}
