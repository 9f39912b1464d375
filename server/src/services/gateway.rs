//! Auth provider gateway: session lookup, social sign-in, sign-out, and the
//! opaque handler for OAuth callbacks.
//!
//! ARCHITECTURE
//! ============
//! Routes see the gateway only through [`AuthGateway`]. The production
//! implementation, [`OAuthGateway`], signs session cookies, talks to the
//! providers over HTTP, and persists through a [`SessionStore`]. Route tests
//! substitute their own implementations of the trait.
//!
//! The generic [`AuthGateway::handle`] takes a raw request and returns a raw
//! response; the router forwards `/api/auth/*` to it without interpreting
//! either side.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, Request};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::oauth::{OAuthClient, OAuthError, authorize_url};
use super::provider::{Provider, ProviderEndpoints};
use super::session::{
    OAUTH_STATE_COOKIE, SESSION_COOKIE, generate_oauth_state, oauth_state_cookie, oauth_state_from_headers,
    removal_cookie, session_cookie, sign_token, token_from_headers,
};
use crate::body::{SessionBody, error_response, found};
use crate::config::{AuthConfig, ProviderCredentials};
use crate::store::{Session, SessionStore, StoreError, User};

/// Prefix the router strips before handing a path to [`AuthGateway::handle`].
pub const AUTH_PREFIX: &str = "/api/auth/";

/// A live session together with its user. `session.user_id == user.id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub user: User,
    pub session: Session,
}

/// Where to send the browser to start a provider login, plus the CSRF cookie
/// that must accompany the redirect.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub url: String,
    pub state_cookie: Cookie<'static>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{} sign-in is not configured", .0.display_name())]
    ProviderNotConfigured(Provider),
    #[error("oauth state missing or mismatched")]
    InvalidState,
    #[error("authorization code missing from callback")]
    MissingCode,
    #[error("provider denied authorization: {0}")]
    Denied(String),
    #[error(transparent)]
    OAuth(#[from] OAuthError),
    #[error("session store: {0}")]
    Store(#[from] StoreError),
}

#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    /// The caller's live session, or `None` when absent, invalid, or expired.
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<SessionView>, GatewayError>;

    async fn sign_in_social(&self, provider: Provider) -> Result<SignIn, GatewayError>;

    /// Invalidate the caller's session and return the cookie that clears it.
    async fn sign_out(&self, headers: &HeaderMap) -> Result<Cookie<'static>, GatewayError>;

    /// Generic handler for everything else under `/api/auth/`.
    async fn handle(&self, request: Request) -> Result<Response, GatewayError>;
}

#[derive(Debug, Default, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

// =============================================================================
// OAUTH GATEWAY
// =============================================================================

pub struct OAuthGateway {
    config: Arc<AuthConfig>,
    store: Arc<dyn SessionStore>,
    oauth: OAuthClient,
    google: ProviderEndpoints,
    github: ProviderEndpoints,
}

impl OAuthGateway {
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client cannot be built.
    pub fn new(config: Arc<AuthConfig>, store: Arc<dyn SessionStore>) -> Result<Self, GatewayError> {
        Ok(Self {
            config,
            store,
            oauth: OAuthClient::new()?,
            google: ProviderEndpoints::for_provider(Provider::Google),
            github: ProviderEndpoints::for_provider(Provider::GitHub),
        })
    }

    /// Replace the endpoints used for `provider`.
    #[must_use]
    pub fn with_endpoints(mut self, provider: Provider, endpoints: ProviderEndpoints) -> Self {
        match provider {
            Provider::Google => self.google = endpoints,
            Provider::GitHub => self.github = endpoints,
        }
        self
    }

    fn endpoints(&self, provider: Provider) -> &ProviderEndpoints {
        match provider {
            Provider::Google => &self.google,
            Provider::GitHub => &self.github,
        }
    }

    fn credentials(&self, provider: Provider) -> Result<&ProviderCredentials, GatewayError> {
        self.config
            .providers
            .get(provider)
            .ok_or(GatewayError::ProviderNotConfigured(provider))
    }

    /// `GET callback/{provider}`: finish the login and set the session cookie.
    async fn callback(&self, provider: Provider, headers: &HeaderMap, query: CallbackQuery) -> Result<Response, GatewayError> {
        let credentials = self.credentials(provider)?;

        let expected = oauth_state_from_headers(headers).ok_or(GatewayError::InvalidState)?;
        if query.state.as_deref() != Some(expected.as_str()) {
            return Err(GatewayError::InvalidState);
        }
        if let Some(reason) = query.error {
            return Err(GatewayError::Denied(reason));
        }
        let code = query
            .code
            .filter(|c| !c.is_empty())
            .ok_or(GatewayError::MissingCode)?;

        let endpoints = self.endpoints(provider);
        let redirect_uri = self.config.redirect_uri(provider);
        let access_token = self
            .oauth
            .exchange_code(endpoints, credentials, &redirect_uri, &code)
            .await?;
        let profile = self
            .oauth
            .fetch_profile(provider, endpoints, &access_token)
            .await?;

        let user = self.store.upsert_user(&profile).await?;
        let expires_at = OffsetDateTime::now_utc() + self.config.session_ttl;
        let (session, token) = self.store.create_session(user.id, expires_at).await?;
        tracing::info!(user_id = %user.id, session_id = %session.id, %provider, "session created");

        let secure = self.config.cookie_secure;
        let jar = CookieJar::new()
            .add(session_cookie(sign_token(&self.config.secret, &token), self.config.session_ttl, secure))
            .add(removal_cookie(OAUTH_STATE_COOKIE, secure));
        Ok((jar, found(self.config.base_url.as_str())).into_response())
    }
}

#[async_trait::async_trait]
impl AuthGateway for OAuthGateway {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<SessionView>, GatewayError> {
        let Some(token) = token_from_headers(&self.config.secret, headers) else {
            return Ok(None);
        };
        let Some(session) = self.store.find_session(&token).await? else {
            return Ok(None);
        };

        if session.is_expired_at(OffsetDateTime::now_utc()) {
            if let Err(e) = self.store.delete_session(&token).await {
                tracing::warn!(error = %e, session_id = %session.id, "failed to prune expired session");
            }
            return Ok(None);
        }

        let Some(user) = self.store.get_user(session.user_id).await? else {
            tracing::warn!(session_id = %session.id, user_id = %session.user_id, "session references missing user");
            return Ok(None);
        };

        Ok(Some(SessionView { user, session }))
    }

    async fn sign_in_social(&self, provider: Provider) -> Result<SignIn, GatewayError> {
        let credentials = self.credentials(provider)?;
        let state = generate_oauth_state();
        let url = authorize_url(
            provider,
            self.endpoints(provider),
            credentials,
            &self.config.redirect_uri(provider),
            &state,
        )?;
        Ok(SignIn { url, state_cookie: oauth_state_cookie(state, self.config.cookie_secure) })
    }

    async fn sign_out(&self, headers: &HeaderMap) -> Result<Cookie<'static>, GatewayError> {
        if let Some(token) = token_from_headers(&self.config.secret, headers) {
            self.store.delete_session(&token).await?;
            tracing::info!("session signed out");
        }
        Ok(removal_cookie(SESSION_COOKIE, self.config.cookie_secure))
    }

    async fn handle(&self, request: Request) -> Result<Response, GatewayError> {
        let (parts, _body) = request.into_parts();
        let path = parts.uri.path();
        let route = path.strip_prefix(AUTH_PREFIX).unwrap_or(path);
        let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();

        match (&parts.method, segments.as_slice()) {
            (&Method::GET, ["callback", provider]) => {
                let Ok(provider) = provider.parse::<Provider>() else {
                    return Ok(error_response(StatusCode::NOT_FOUND, "Unknown provider", provider));
                };
                let query = Query::<CallbackQuery>::try_from_uri(&parts.uri)
                    .map(|Query(q)| q)
                    .unwrap_or_default();
                self.callback(provider, &parts.headers, query).await
            }
            (&Method::GET, ["get-session"]) => {
                let body = SessionBody::from(self.get_session(&parts.headers).await?);
                Ok(Json(body).into_response())
            }
            (&Method::POST, ["sign-out"]) => {
                let cookie = self.sign_out(&parts.headers).await?;
                Ok((CookieJar::new().add(cookie), Json(serde_json::json!({ "success": true }))).into_response())
            }
            _ => Ok(error_response(StatusCode::NOT_FOUND, "Not found", path)),
        }
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
