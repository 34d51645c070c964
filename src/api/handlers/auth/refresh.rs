//! Refresh endpoint: exchange the refresh cookie for a new access token.

use axum::{extract::Extension, http::HeaderMap, response::Response};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::service::{self, RefreshOutcome};
use super::state::AuthConfig;
use super::storage::PgAuthStore;
use super::types::{RefreshData, RefreshUser};
use super::utils::{extract_cookie, REFRESH_COOKIE_NAME};
use crate::api::handlers::response;

#[utoipa::path(
    post,
    path = "/api/refresh",
    responses(
        (status = 200, description = "New access token for the refresh token's owner", body = RefreshData),
        (status = 401, description = "Refresh token cookie missing, invalid, expired, or revoked"),
    ),
    tag = "auth"
)]
pub async fn refresh(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
) -> Response {
    let Some(refresh_token) = extract_cookie(&headers, REFRESH_COOKIE_NAME) else {
        return response::unauthorized("Refresh token cookie required");
    };

    let store = PgAuthStore::new(pool.0.clone());
    match service::refresh(&store, &auth_config, &refresh_token).await {
        Ok(RefreshOutcome::Success { token, username }) => response::success(
            "Token refreshed",
            json!(RefreshData {
                token,
                user: RefreshUser { username },
            }),
        ),
        Ok(RefreshOutcome::Invalid) => {
            response::unauthorized("Invalid or expired refresh token")
        }
        Err(err) => {
            error!("refresh failed: {err}");
            response::internal_error("Failed to refresh token")
        }
    }
}
