//! Session store contract and its adapters.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store owns user and session records. The gateway is its only client
//! and reaches it through the narrow [`SessionStore`] trait, so the backing
//! datastore (PostgreSQL, or memory when no database is configured) is a
//! startup decision invisible to routes.

pub mod memory;
pub mod postgres;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::provider::OAuthProfile;

pub use memory::MemoryStore;
pub use postgres::PgStore;

// =============================================================================
// RECORDS
// =============================================================================

/// Identity record, created on first successful OAuth login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// One authenticated browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Expired sessions are absent to every consumer, pruned or not.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user {0} does not exist")]
    UnknownUser(Uuid),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Find the user linked to the profile's provider account, creating it on
    /// first login. Existing users keep their id; name and image are refreshed.
    async fn upsert_user(&self, profile: &OAuthProfile) -> Result<User, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Create a session for an existing user and return it with its bearer token.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownUser`] if `user_id` has no user record.
    async fn create_session(&self, user_id: Uuid, expires_at: OffsetDateTime) -> Result<(Session, String), StoreError>;

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError>;

    /// Remove a session. Deleting an unknown token is not an error.
    async fn delete_session(&self, token: &str) -> Result<(), StoreError>;
}
