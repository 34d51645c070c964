//! Authenticated principal extraction for protected routes.
//!
//! Flow Overview: pull the access token from the `Authorization: Bearer`
//! header (cookie fallback), fast-fail against the blacklist, verify the
//! signature and expiry, and hand the resulting principal to the handler.
//! Handlers call this before any of their own logic so a failed step never
//! reaches the endpoint body.

use axum::{http::HeaderMap, response::Response};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::service;
use super::state::AuthConfig;
use super::storage::PgAuthStore;
use super::utils::extract_access_token;
use crate::api::handlers::response;

/// Authenticated user context derived from a verified access token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
}

/// Resolve the request's access token into a principal, or return the 401
/// (or 500 on storage failure) response that must short-circuit the handler.
pub(crate) async fn require_auth(
    headers: &HeaderMap,
    pool: &PgPool,
    config: &AuthConfig,
) -> Result<Principal, Response> {
    let Some(token) = extract_access_token(headers) else {
        return Err(response::unauthorized(
            "Token required (Authorization header or cookie)",
        ));
    };

    let store = PgAuthStore::new(pool.clone());
    match service::authenticate(&store, config, &token).await {
        Ok(Some(principal)) => Ok(principal),
        Ok(None) => Err(response::unauthorized("Invalid or expired token")),
        Err(err) => {
            error!("failed to authenticate request: {err}");
            Err(response::internal_error("Authentication failed"))
        }
    }
}
