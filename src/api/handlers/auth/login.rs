//! Login endpoint: credentials in, bearer token + refresh cookie out.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::service::{self, LoginOutcome};
use super::state::{AuthConfig, REFRESH_TOKEN_TTL_SECONDS};
use super::storage::PgAuthStore;
use super::types::{LoginRequest, TokenData};
use super::utils::refresh_cookie;
use crate::api::handlers::response;

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; access token in the body, refresh token in an HttpOnly cookie", body = TokenData),
        (status = 400, description = "Missing or malformed credentials payload"),
        (status = 401, description = "Unknown username or wrong password"),
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return response::bad_request("Missing credentials payload");
    };

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return response::bad_request("Username and password are required");
    }

    let store = PgAuthStore::new(pool.0.clone());
    match service::login(&store, &auth_config, &payload.username, &payload.password).await {
        Ok(LoginOutcome::Success {
            token,
            refresh_token,
        }) => {
            // The access token goes in the body only; the refresh token is
            // cookie-bound so browsers never expose it to scripts.
            let Ok(cookie) = refresh_cookie(&auth_config, &refresh_token, REFRESH_TOKEN_TTL_SECONDS)
            else {
                error!("failed to build refresh cookie");
                return response::internal_error("Login failed");
            };
            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);
            (
                StatusCode::OK,
                headers,
                response::success_body("Login successful", json!(TokenData { token })),
            )
                .into_response()
        }
        Ok(LoginOutcome::UnknownUser) => response::unauthorized("Username not found"),
        Ok(LoginOutcome::WrongPassword) => response::unauthorized("Wrong password"),
        Err(err) => {
            error!("login failed: {err}");
            response::internal_error("Login failed")
        }
    }
}
