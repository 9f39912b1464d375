use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
};
use axum::http::Request;
use tower::ServiceExt;

use super::*;
use crate::state::test_helpers::{TEST_BASE_URL, config_with, memory_gateway, test_config};

fn test_app() -> Router {
    let (gateway, _store) = memory_gateway(test_config());
    app(AppState::new(Arc::new(test_config()), Arc::new(gateway)))
}

// =============================================================================
// healthz
// =============================================================================

#[tokio::test]
async fn healthz_is_ok() {
    let resp = test_app()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn static_dir_serves_client_at_root() {
    let dir = std::env::temp_dir().join(format!("auth-server-static-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<html>client</html>").unwrap();

    let config = config_with(&[("STATIC_DIR", dir.to_str().unwrap())]);
    let (gateway, _store) = memory_gateway(config.clone());
    let app = app(AppState::new(Arc::new(config), Arc::new(gateway)));

    let resp = app.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>client</html>");

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn without_static_dir_root_is_404() {
    let resp = test_app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn preflight_from_app_origin_is_allowed_with_credentials() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/auth/session")
        .header(ORIGIN, TEST_BASE_URL)
        .header(ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let resp = test_app().oneshot(req).await.unwrap();

    let headers = resp.headers();
    assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], TEST_BASE_URL);
    assert_eq!(headers[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "600");
}

#[tokio::test]
async fn foreign_origin_gets_no_allow_origin() {
    let req = Request::get("/api/auth/session")
        .header(ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let resp = test_app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn same_origin_request_echoes_origin() {
    let req = Request::get("/api/auth/session")
        .header(ORIGIN, TEST_BASE_URL)
        .body(Body::empty())
        .unwrap();
    let resp = test_app().oneshot(req).await.unwrap();

    assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], TEST_BASE_URL);
}

#[tokio::test]
async fn unusable_origin_allows_nothing() {
    let app: Router = Router::new()
        .route("/x", get(healthz))
        .layer(cors_layer("http://bad\norigin"));
    let req = Request::get("/x")
        .header(ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
