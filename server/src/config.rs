//! Server configuration parsed from environment variables.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here aborts startup. Every key is optional; an absent or
//! unparseable value falls back to a documented default, and fallbacks that
//! leave the server degraded (shared dev secret, non-durable store) are
//! logged as warnings once at load time.

use std::path::PathBuf;

use time::Duration;
use url::Url;

use crate::services::provider::Provider;

pub const DEFAULT_SECRET: &str = "dev-secret-change-in-production";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is not a valid absolute URL: {value}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("{key} is not a valid number: {value}")]
    InvalidNumber { key: &'static str, value: String },
}

/// OAuth client id/secret pair for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// The set of providers registered with the gateway.
///
/// A provider is present only when both halves of its credentials were
/// supplied; partial credentials leave it out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSet {
    pub google: Option<ProviderCredentials>,
    pub github: Option<ProviderCredentials>,
}

impl ProviderSet {
    #[must_use]
    pub fn get(&self, provider: Provider) -> Option<&ProviderCredentials> {
        match provider {
            Provider::Google => self.google.as_ref(),
            Provider::GitHub => self.github.as_ref(),
        }
    }

    /// Providers with credentials, in declaration order.
    #[must_use]
    pub fn enabled(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.get(*p).is_some())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key for session cookie signatures.
    pub secret: String,
    /// Public base URL. Its origin is the only CORS-allowed origin.
    pub base_url: Url,
    pub providers: ProviderSet,
    /// Datastore connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    /// Built client assets served for every path the router does not own.
    pub static_dir: Option<PathBuf>,
}

impl AuthConfig {
    /// Build config from the process environment.
    ///
    /// Keys: `AUTH_SECRET`, `AUTH_URL`, `GOOGLE_CLIENT_ID`,
    /// `GOOGLE_CLIENT_SECRET`, `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET`,
    /// `DATABASE_URL`, `DB_MAX_CONNECTIONS`, `PORT`, `SESSION_TTL_SECS`,
    /// `COOKIE_SECURE`, `STATIC_DIR`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let secret = get("AUTH_SECRET").unwrap_or_else(|| {
            tracing::warn!("AUTH_SECRET is not set, using the development default");
            DEFAULT_SECRET.to_owned()
        });

        let base_url = match get("AUTH_URL").map(|raw| parse_base_url("AUTH_URL", &raw)) {
            Some(Ok(url)) => url,
            Some(Err(e)) => {
                tracing::warn!(error = %e, fallback = DEFAULT_BASE_URL, "ignoring AUTH_URL");
                default_base_url()
            }
            None => default_base_url(),
        };

        let providers = ProviderSet {
            google: provider_credentials(&get, "GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"),
            github: provider_credentials(&get, "GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET"),
        };

        let database_url = get("DATABASE_URL");
        if database_url.is_none() {
            tracing::warn!("DATABASE_URL is not set, sessions will not survive a restart");
        }

        let db_max_connections = number_or(&get, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS);
        let port = number_or(&get, "PORT", DEFAULT_PORT);
        let session_ttl = Duration::seconds(number_or(&get, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS).max(1));

        let cookie_secure = get("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or_else(|| base_url.scheme() == "https");

        let static_dir = get("STATIC_DIR").map(PathBuf::from);

        Self {
            secret,
            base_url,
            providers,
            database_url,
            db_max_connections,
            port,
            session_ttl,
            cookie_secure,
            static_dir,
        }
    }

    /// Serialized origin of the base URL, e.g. `https://app.example.com`.
    #[must_use]
    pub fn app_origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// OAuth redirect URI registered with `provider`.
    #[must_use]
    pub fn redirect_uri(&self, provider: Provider) -> String {
        format!("{}/api/auth/callback/{}", self.base_url.as_str().trim_end_matches('/'), provider.as_str())
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn provider_credentials<G>(get: &G, id_key: &str, secret_key: &str) -> Option<ProviderCredentials>
where
    G: Fn(&str) -> Option<String>,
{
    match (get(id_key), get(secret_key)) {
        (Some(client_id), Some(client_secret)) => Some(ProviderCredentials { client_id, client_secret }),
        (None, None) => None,
        _ => {
            tracing::debug!(id_key, secret_key, "partial provider credentials, provider disabled");
            None
        }
    }
}

fn number_or<G, T>(get: &G, key: &'static str, default: T) -> T
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match get(key).map(|raw| parse_number::<T>(key, &raw)) {
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            tracing::warn!(error = %e, %default, "ignoring {key}");
            default
        }
        None => default,
    }
}

pub(crate) fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidUrl { key, value: raw.to_owned() })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl { key, value: raw.to_owned() });
    }
    Ok(url)
}

pub(crate) fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber { key, value: raw.to_owned() })
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
