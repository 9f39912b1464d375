//! OAuth exchange: authorize URL, code-for-token exchange, profile fetch.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::provider::{GitHubEmail, GitHubUser, GoogleUserInfo, OAuthProfile, Provider, ProviderEndpoints};
use crate::config::ProviderCredentials;

const USER_AGENT: &str = "auth-server";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("invalid provider endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("provider api error: {0}")]
    ProviderApi(String),
    #[error("provider did not return an email address")]
    MissingEmail,
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Build the provider authorization URL the browser is redirected to.
pub fn authorize_url(
    provider: Provider,
    endpoints: &ProviderEndpoints,
    credentials: &ProviderCredentials,
    redirect_uri: &str,
    state: &str,
) -> Result<String, OAuthError> {
    let url = Url::parse_with_params(
        &endpoints.authorize_url,
        &[
            ("client_id", credentials.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", provider.scopes()),
            ("state", state),
        ],
    )
    .map_err(|e| OAuthError::InvalidEndpoint(format!("{}: {e}", endpoints.authorize_url)))?;
    Ok(url.into())
}

/// HTTP client for talking to providers.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
}

impl OAuthClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, OAuthError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OAuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        endpoints: &ProviderEndpoints,
        credentials: &ProviderCredentials,
        redirect_uri: &str,
        code: &str,
    ) -> Result<String, OAuthError> {
        let resp = self
            .http
            .post(&endpoints.token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| OAuthError::TokenExchange(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| OAuthError::TokenExchange(e.to_string()))?;
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|_| OAuthError::TokenExchange(format!("unexpected response ({status}): {body}")))?;

        match parsed {
            TokenResponse { access_token: Some(token), .. } if status.is_success() => Ok(token),
            TokenResponse { error, error_description, .. } => Err(OAuthError::TokenExchange(
                error_description
                    .or(error)
                    .unwrap_or_else(|| format!("status {status}")),
            )),
        }
    }

    /// Fetch and normalize the signed-in account's profile.
    pub async fn fetch_profile(
        &self,
        provider: Provider,
        endpoints: &ProviderEndpoints,
        access_token: &str,
    ) -> Result<OAuthProfile, OAuthError> {
        match provider {
            Provider::Google => {
                let info: GoogleUserInfo = self.get_json(&endpoints.userinfo_url, access_token).await?;
                info.into_profile().ok_or(OAuthError::MissingEmail)
            }
            Provider::GitHub => {
                let user: GitHubUser = self.get_json(&endpoints.userinfo_url, access_token).await?;
                let emails = match (&user.email, &endpoints.emails_url) {
                    (None, Some(url)) => self.get_json::<Vec<GitHubEmail>>(url, access_token).await?,
                    _ => Vec::new(),
                };
                user.into_profile(&emails).ok_or(OAuthError::MissingEmail)
            }
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, access_token: &str) -> Result<T, OAuthError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| OAuthError::ProviderApi(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OAuthError::ProviderApi(format!("{status}: {body}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| OAuthError::ProviderApi(e.to_string()))
    }
}

#[cfg(test)]
#[path = "oauth_test.rs"]
mod tests;
