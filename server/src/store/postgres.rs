//! PostgreSQL-backed store.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Session, SessionStore, StoreError, User};
use crate::services::provider::OAuthProfile;
use crate::services::session::generate_token;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User { id: row.get("id"), name: row.get("name"), email: row.get("email"), image: row.get("image") }
}

#[async_trait::async_trait]
impl SessionStore for PgStore {
    async fn upsert_user(&self, profile: &OAuthProfile) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;

        let linked: Option<Uuid> = sqlx::query_scalar("SELECT user_id FROM accounts WHERE provider = $1 AND account_id = $2")
            .bind(profile.provider.as_str())
            .bind(&profile.account_id)
            .fetch_optional(&mut *tx)
            .await?;

        let row = if let Some(user_id) = linked {
            sqlx::query("UPDATE users SET name = $2, image = $3 WHERE id = $1 RETURNING id, name, email, image")
                .bind(user_id)
                .bind(&profile.name)
                .bind(&profile.image)
                .fetch_one(&mut *tx)
                .await?
        } else {
            let row = sqlx::query(
                "INSERT INTO users (id, name, email, image) VALUES ($1, $2, $3, $4) RETURNING id, name, email, image",
            )
            .bind(Uuid::new_v4())
            .bind(&profile.name)
            .bind(&profile.email)
            .bind(&profile.image)
            .fetch_one(&mut *tx)
            .await?;
            sqlx::query("INSERT INTO accounts (provider, account_id, user_id) VALUES ($1, $2, $3)")
                .bind(profile.provider.as_str())
                .bind(&profile.account_id)
                .bind(row.get::<Uuid, _>("id"))
                .execute(&mut *tx)
                .await?;
            row
        };

        tx.commit().await?;
        Ok(user_from_row(&row))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, name, email, image FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn create_session(&self, user_id: Uuid, expires_at: OffsetDateTime) -> Result<(Session, String), StoreError> {
        let token = generate_token();
        let session = Session { id: Uuid::new_v4(), user_id, expires_at };
        let inserted = sqlx::query("INSERT INTO sessions (token, id, user_id, expires_at) VALUES ($1, $2, $3, $4)")
            .bind(&token)
            .bind(session.id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(_) => Ok((session, token)),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => Err(StoreError::UnknownUser(user_id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let row = sqlx::query("SELECT id, user_id, expires_at FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| Session { id: r.get("id"), user_id: r.get("user_id"), expires_at: r.get("expires_at") }))
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "postgres_test.rs"]
mod tests;
