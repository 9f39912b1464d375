//! Auth routes: session lookup, social sign-in, sign-out, and the catch-all
//! forward to the gateway.
//!
//! ERROR HANDLING
//! ==============
//! No gateway error escapes as an empty 500. The session route always answers
//! 200 with the session body (carrying `error` on failure) so the browser can
//! branch on one shape; every other route answers `{error, details}`.

use axum::extract::{Path, Request, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::body::{SessionBody, error_response, found};
use crate::services::provider::Provider;
use crate::state::AppState;

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/auth/session`: the caller's session, or nulls.
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let body = match state.gateway.get_session(&headers).await {
        Ok(view) => SessionBody::from(view),
        Err(e) => {
            tracing::warn!(error = %e, "session lookup failed");
            SessionBody::failed(e.to_string())
        }
    };
    (
        [(CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Json(body),
    )
        .into_response()
}

/// `GET /api/auth/sign-in/{provider}`: redirect to the provider's consent page.
pub async fn sign_in(State(state): State<AppState>, Path(provider): Path<String>) -> Response {
    let provider = match provider.parse::<Provider>() {
        Ok(p) => p,
        Err(e) => return error_response(StatusCode::NOT_FOUND, "Unknown provider", e),
    };

    match state.gateway.sign_in_social(provider).await {
        Ok(sign_in) => {
            let jar = CookieJar::new().add(sign_in.state_cookie);
            (jar, found(&sign_in.url)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, %provider, "sign-in failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{} sign-in failed", provider.display_name()),
                e,
            )
        }
    }
}

/// `GET /api/auth/sign-out`: drop the session and go back to the app root.
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.gateway.sign_out(&headers).await {
        Ok(cookie) => (CookieJar::new().add(cookie), found("/")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "sign-out failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Sign out failed", e)
        }
    }
}

/// `ANY /api/auth/*`: hand the raw request to the gateway.
pub async fn forward(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path().to_owned();
    match state.gateway.handle(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, %path, "auth handler failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed", e)
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
