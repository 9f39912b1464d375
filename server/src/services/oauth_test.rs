use super::*;
use crate::state::test_helpers::{ACCESS_TOKEN, GOOD_CODE, mock_endpoints, spawn_mock_provider};

fn creds() -> ProviderCredentials {
    ProviderCredentials { client_id: "my_client_id".into(), client_secret: "shh".into() }
}

// =============================================================================
// authorize_url
// =============================================================================

#[test]
fn authorize_url_carries_oauth_parameters() {
    let endpoints = ProviderEndpoints::for_provider(Provider::GitHub);
    let url = authorize_url(Provider::GitHub, &endpoints, &creds(), "http://localhost/cb", "csrf_abc").unwrap();
    assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
    assert!(url.contains("client_id=my_client_id"));
    assert!(url.contains("state=csrf_abc"));
    assert!(url.contains("response_type=code"));
}

#[test]
fn authorize_url_encodes_redirect_and_scopes() {
    let endpoints = ProviderEndpoints::for_provider(Provider::Google);
    let url = authorize_url(Provider::Google, &endpoints, &creds(), "http://localhost:3000/cb", "st").unwrap();
    let parsed = Url::parse(&url).unwrap();
    let pairs: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
    assert_eq!(pairs["redirect_uri"], "http://localhost:3000/cb");
    assert_eq!(pairs["scope"], "openid email profile");
    assert!(!url.contains("client_secret"));
}

#[test]
fn authorize_url_rejects_broken_endpoint() {
    let mut endpoints = ProviderEndpoints::for_provider(Provider::Google);
    endpoints.authorize_url = "not a url".into();
    let err = authorize_url(Provider::Google, &endpoints, &creds(), "http://x/cb", "st").unwrap_err();
    assert!(matches!(err, OAuthError::InvalidEndpoint(_)));
}

// =============================================================================
// OAuthError display
// =============================================================================

#[test]
fn oauth_error_display_includes_cause() {
    let msg = OAuthError::TokenExchange("timeout".into()).to_string();
    assert!(msg.contains("token exchange"));
    assert!(msg.contains("timeout"));
    assert!(OAuthError::ProviderApi("403 Forbidden".into()).to_string().contains("403 Forbidden"));
}

// =============================================================================
// Exchange against a mock provider
// =============================================================================

#[tokio::test]
async fn exchange_code_returns_access_token() {
    let base = spawn_mock_provider().await;
    let client = OAuthClient::new().unwrap();
    let endpoints = mock_endpoints(&base, Provider::GitHub);
    let token = client
        .exchange_code(&endpoints, &creds(), "http://app/cb", GOOD_CODE)
        .await
        .unwrap();
    assert_eq!(token, ACCESS_TOKEN);
}

#[tokio::test]
async fn exchange_code_surfaces_provider_error_description() {
    let base = spawn_mock_provider().await;
    let client = OAuthClient::new().unwrap();
    let endpoints = mock_endpoints(&base, Provider::Google);
    let err = client
        .exchange_code(&endpoints, &creds(), "http://app/cb", "stale-code")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("incorrect or expired"));
}

#[tokio::test]
async fn exchange_code_unreachable_provider_fails() {
    let client = OAuthClient::new().unwrap();
    let endpoints = mock_endpoints("http://127.0.0.1:1", Provider::Google);
    let err = client
        .exchange_code(&endpoints, &creds(), "http://app/cb", GOOD_CODE)
        .await
        .unwrap_err();
    assert!(matches!(err, OAuthError::TokenExchange(_)));
}

#[tokio::test]
async fn fetch_google_profile() {
    let base = spawn_mock_provider().await;
    let client = OAuthClient::new().unwrap();
    let profile = client
        .fetch_profile(Provider::Google, &mock_endpoints(&base, Provider::Google), ACCESS_TOKEN)
        .await
        .unwrap();
    assert_eq!(profile.account_id, "google-sub-1");
    assert_eq!(profile.email, "grace@example.com");
}

#[tokio::test]
async fn fetch_github_profile_uses_email_fallback() {
    let base = spawn_mock_provider().await;
    let client = OAuthClient::new().unwrap();
    let profile = client
        .fetch_profile(Provider::GitHub, &mock_endpoints(&base, Provider::GitHub), ACCESS_TOKEN)
        .await
        .unwrap();
    assert_eq!(profile.account_id, "583231");
    assert_eq!(profile.name, "octocat");
    assert_eq!(profile.email, "octocat@example.com");
}

#[tokio::test]
async fn fetch_profile_with_bad_token_is_provider_error() {
    let base = spawn_mock_provider().await;
    let client = OAuthClient::new().unwrap();
    let err = client
        .fetch_profile(Provider::Google, &mock_endpoints(&base, Provider::Google), "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, OAuthError::ProviderApi(msg) if msg.contains("401")));
}
