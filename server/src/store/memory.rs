//! In-process store used when no database is configured, and by tests.
//!
//! TRADE-OFFS
//! ==========
//! Records live only as long as the process. Expired sessions are not swept
//! here; the gateway deletes them lazily when it reads one.

use std::collections::HashMap;

use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Session, SessionStore, StoreError, User};
use crate::services::provider::OAuthProfile;
use crate::services::session::generate_token;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// `(provider, provider account id)` -> user id.
    accounts: HashMap<(String, String), Uuid>,
    /// Bearer token -> session.
    sessions: HashMap<String, Session>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored session rows, expired or not.
    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemoryStore {
    async fn upsert_user(&self, profile: &OAuthProfile) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        let key = (profile.provider.as_str().to_owned(), profile.account_id.clone());

        if let Some(id) = tables.accounts.get(&key).copied() {
            if let Some(user) = tables.users.get_mut(&id) {
                user.name.clone_from(&profile.name);
                user.image.clone_from(&profile.image);
                return Ok(user.clone());
            }
        }

        let user = User {
            id: Uuid::new_v4(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            image: profile.image.clone(),
        };
        tables.users.insert(user.id, user.clone());
        tables.accounts.insert(key, user.id);
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create_session(&self, user_id: Uuid, expires_at: OffsetDateTime) -> Result<(Session, String), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }
        let token = generate_token();
        let session = Session { id: Uuid::new_v4(), user_id, expires_at };
        tables.sessions.insert(token.clone(), session.clone());
        Ok((session, token))
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.tables.read().await.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        self.tables.write().await.sessions.remove(token);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
