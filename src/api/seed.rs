//! First-user provisioning.
//!
//! Users are created out-of-band in this system; the seed step creates the
//! initial account so a fresh deployment can log in at all. It only runs when
//! the users table is empty and credentials were configured.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::{debug, info, Instrument};

use super::handlers::auth::hash_password;

#[derive(Debug)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
}

/// Create the seed user when the users table is empty.
///
/// # Errors
/// Returns an error if the count, hash, or insert fails.
pub(crate) async fn seed_users(pool: &PgPool, seed: Option<SeedUser>) -> Result<()> {
    let query = "SELECT COUNT(*) AS total FROM users";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let count: i64 = sqlx::query(query)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to count users for seeding")?
        .get("total");

    if count > 0 {
        debug!("users already exist ({count} found), skipping seeder");
        return Ok(());
    }

    let Some(seed) = seed else {
        info!("users table is empty and no seed credentials configured; skipping seeder");
        return Ok(());
    };

    let password_hash = hash_password(&seed.password)?;

    let query = "INSERT INTO users (username, password_hash) VALUES ($1, $2)";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(&seed.username)
        .bind(&password_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert seed user")?;

    info!("created seed user: {}", seed.username);
    Ok(())
}
