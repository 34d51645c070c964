//! SQL implementation of the auth persistence interface.
//!
//! Every ledger operation is a single atomic statement; the state machine
//! never needs a transaction across them.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::store::{AuthStore, RefreshRecord, UserRecord};
use super::utils::is_unique_violation;

#[derive(Clone)]
pub(crate) struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthStore for PgAuthStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let query = "SELECT id, username, password_hash FROM users WHERE username = $1 LIMIT 1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user by username")?;

        Ok(row.map(|row| UserRecord {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        let query = "SELECT id, username, password_hash FROM users WHERE id = $1 LIMIT 1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user by id")?;

        Ok(row.map(|row| UserRecord {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn create_refresh(&self, user_id: Uuid, token: &str, ttl_seconds: i64) -> Result<()> {
        let query = r"
            INSERT INTO refresh_tokens (user_id, token, expires_at)
            VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(user_id)
            .bind(token)
            .bind(ttl_seconds)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to insert refresh token")?;
        Ok(())
    }

    async fn find_refresh(&self, token: &str) -> Result<Option<RefreshRecord>> {
        let query = r"
            SELECT user_id
            FROM refresh_tokens
            WHERE token = $1
              AND revoked = FALSE
              AND expires_at > NOW()
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(token)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup refresh token")?;

        Ok(row.map(|row| RefreshRecord {
            user_id: row.get("user_id"),
        }))
    }

    async fn revoke_refresh(&self, token: &str) -> Result<()> {
        // Matching zero rows is fine; the token may already be revoked or expired.
        let query = r"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE token = $1
              AND revoked = FALSE
              AND expires_at > NOW()
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(token)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to revoke refresh token")?;
        Ok(())
    }

    async fn is_blacklisted(&self, token_hash: &[u8]) -> Result<bool> {
        let query = r"
            SELECT 1
            FROM blacklisted_tokens
            WHERE token_hash = $1
              AND expires_at > NOW()
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to probe token blacklist")?;
        Ok(row.is_some())
    }

    async fn create_blacklist(&self, token_hash: &[u8], expires_at_unix: i64) -> Result<()> {
        let query = r"
            INSERT INTO blacklisted_tokens (token_hash, expires_at)
            VALUES ($1, to_timestamp($2))
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(token_hash)
            .bind(expires_at_unix)
            .execute(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(_) => Ok(()),
            // Two concurrent logouts of the same token both succeed; the
            // fingerprint is already in the ledger.
            Err(err) if is_unique_violation(&err) => Ok(()),
            Err(err) => Err(err).context("failed to insert blacklist entry"),
        }
    }
}
