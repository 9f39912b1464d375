//! Social login providers and their OAuth endpoints.
//!
//! DESIGN
//! ======
//! The provider set is closed (`google`, `github`), so it is an enum rather
//! than a registry. Endpoint URLs are data, not constants, which lets tests
//! aim the exchange at a local mock provider.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
    GitHub,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Google, Provider::GitHub];

    /// Path segment and storage key, e.g. `"github"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
        }
    }

    /// Human-facing name used in error bodies.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::GitHub => "GitHub",
        }
    }

    #[must_use]
    pub fn scopes(self) -> &'static str {
        match self {
            Self::Google => "openid email profile",
            Self::GitHub => "read:user user:email",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::GitHub),
            other => Err(UnknownProvider(other.to_owned())),
        }
    }
}

/// Where a provider's authorize, token, and profile APIs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    /// GitHub only: fallback for accounts with a private primary email.
    pub emails_url: Option<String>,
}

impl ProviderEndpoints {
    #[must_use]
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::Google => Self {
                authorize_url: "https://accounts.google.com/o/oauth2/v2/auth".into(),
                token_url: "https://oauth2.googleapis.com/token".into(),
                userinfo_url: "https://openidconnect.googleapis.com/v1/userinfo".into(),
                emails_url: None,
            },
            Provider::GitHub => Self {
                authorize_url: "https://github.com/login/oauth/authorize".into(),
                token_url: "https://github.com/login/oauth/access_token".into(),
                userinfo_url: "https://api.github.com/user".into(),
                emails_url: Some("https://api.github.com/user/emails".into()),
            },
        }
    }
}

// =============================================================================
// PROFILES
// =============================================================================

/// Provider-neutral identity produced by a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub provider: Provider,
    /// The provider's stable account id (`sub` for Google, numeric id for GitHub).
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubEmail {
    pub email: String,
    pub primary: bool,
    pub verified: bool,
}

impl GoogleUserInfo {
    /// Returns `None` when Google withheld the email scope.
    #[must_use]
    pub fn into_profile(self) -> Option<OAuthProfile> {
        let email = self.email?;
        let name = self.name.unwrap_or_else(|| email.clone());
        Some(OAuthProfile { provider: Provider::Google, account_id: self.sub, name, email, image: self.picture })
    }
}

impl GitHubUser {
    /// Normalize, taking the email from `emails` when the profile hides it.
    #[must_use]
    pub fn into_profile(self, emails: &[GitHubEmail]) -> Option<OAuthProfile> {
        let email = self.email.or_else(|| primary_email(emails))?;
        let name = self.name.filter(|n| !n.is_empty()).unwrap_or(self.login);
        Some(OAuthProfile {
            provider: Provider::GitHub,
            account_id: self.id.to_string(),
            name,
            email,
            image: self.avatar_url,
        })
    }
}

/// Primary verified address, else any verified address.
#[must_use]
pub fn primary_email(emails: &[GitHubEmail]) -> Option<String> {
    emails
        .iter()
        .find(|e| e.primary && e.verified)
        .or_else(|| emails.iter().find(|e| e.verified))
        .map(|e| e.email.clone())
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
