//! JSON bodies and redirects shared by the router and the gateway.
//!
//! DESIGN
//! ======
//! The browser branches on body shape, so there are exactly two: the session
//! body (`{user, session, error?}`) and the failure body (`{error, details}`).
//! Every handler funnels its outcome through one of them.

use axum::Json;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::services::gateway::SessionView;
use crate::store::{Session, User};

/// Body of `GET /api/auth/session`. `user` and `session` are both set or both null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBody {
    pub user: Option<User>,
    pub session: Option<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionBody {
    #[must_use]
    pub fn empty() -> Self {
        Self { user: None, session: None, error: None }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self { user: None, session: None, error: Some(message.into()) }
    }
}

impl From<Option<SessionView>> for SessionBody {
    fn from(view: Option<SessionView>) -> Self {
        match view {
            Some(SessionView { user, session }) => Self { user: Some(user), session: Some(session), error: None },
            None => Self::empty(),
        }
    }
}

/// Structured failure body: a short label plus the underlying cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

/// `status` with an `{error, details}` body.
pub fn error_response(status: StatusCode, error: impl Into<String>, details: impl ToString) -> Response {
    (status, Json(ErrorBody { error: error.into(), details: details.to_string() })).into_response()
}

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}
