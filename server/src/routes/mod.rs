//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the auth endpoints under a single Axum router. The
//! browser client talks to `/api/auth/*`; everything under that prefix that
//! is not a named route is forwarded to the gateway untouched.
//!
//! CORS
//! ====
//! Only the configured application origin may make credentialed requests;
//! any other origin gets no `Access-Control-Allow-Origin` header at all.
//! The session cookie must never be readable by any other origin, so there is
//! no wildcard fallback.

pub mod auth;

use std::time::Duration;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.app_origin());
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        // Non-GET requests on named paths go to the gateway too.
        .route("/api/auth/session", get(auth::session).post(auth::forward))
        .route("/api/auth/sign-in/{provider}", get(auth::sign_in).post(auth::forward))
        .route("/api/auth/sign-out", get(auth::sign_out).post(auth::forward))
        .route("/api/auth/{*rest}", get(auth::forward).post(auth::forward))
        .route("/healthz", get(healthz))
        .with_state(state);

    // Client bundle at `/`, where sign-in and sign-out redirects land.
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// CORS for exactly one origin, with credentials.
pub(crate) fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::list([value]),
        Err(e) => {
            tracing::error!(error = %e, %origin, "configured origin is not a valid header value; cross-origin requests disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
