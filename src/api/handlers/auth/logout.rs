//! Logout endpoint: blacklist the access token, revoke the refresh token,
//! clear the cookie.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::principal::require_auth;
use super::service;
use super::state::AuthConfig;
use super::storage::PgAuthStore;
use super::utils::{clear_refresh_cookie, extract_bearer_token, extract_cookie, REFRESH_COOKIE_NAME};
use crate::api::handlers::response;

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Access token blacklisted, refresh token revoked, cookie cleared"),
        (status = 400, description = "refresh_token cookie missing"),
        (status = 401, description = "Authorization header missing or token invalid"),
        (status = 500, description = "Blacklist write failed; the token was NOT revoked"),
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &auth_config).await {
        Ok(principal) => principal,
        Err(rejection) => return rejection,
    };

    // Logout needs the exact bearer string to fingerprint it; the cookie
    // fallback accepted by `require_auth` is not enough here.
    let Some(bearer_token) = extract_bearer_token(&headers) else {
        return response::unauthorized("Authorization header required (Bearer <token>)");
    };

    let Some(refresh_token) = extract_cookie(&headers, REFRESH_COOKIE_NAME) else {
        return response::bad_request("refresh_token cookie required");
    };

    let store = PgAuthStore::new(pool.0.clone());
    let refresh_revoked =
        match service::logout(&store, &auth_config, &bearer_token, &refresh_token).await {
            Ok(revoked) => revoked,
            Err(err) => {
                // A failed blacklist write means the token would stay valid;
                // that must not masquerade as a successful logout.
                error!("failed to blacklist access token: {err}");
                return response::internal_error("Failed to blacklist token");
            }
        };

    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_refresh_cookie(&auth_config) {
        response_headers.insert(SET_COOKIE, cookie);
    }

    let message = if refresh_revoked {
        "Logout successful. Token blacklisted & refresh token revoked."
    } else {
        "Logout successful. Token blacklisted."
    };

    (
        StatusCode::OK,
        response_headers,
        response::success_body(
            "Logout successful",
            json!({
                "message": message,
                "username": principal.username,
            }),
        ),
    )
        .into_response()
}
