//! User lookup endpoints for the authenticated principal.

use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
    response::Response,
};
use serde_json::json;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::{error, Instrument};
use uuid::Uuid;

use super::auth::types::ProfileData;
use super::auth::{require_auth, AuthConfig};
use super::response;

struct UserRow {
    id: String,
    username: String,
    created_at: String,
    updated_at: String,
}

#[utoipa::path(
    get,
    path = "/api/admin/profile",
    responses(
        (status = 200, description = "The authenticated principal's profile", body = ProfileData),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "users"
)]
pub async fn profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &auth_config).await {
        Ok(principal) => principal,
        Err(rejection) => return rejection,
    };

    match fetch_user(&pool, principal.user_id).await {
        Ok(Some(user)) => response::success(
            "Profile fetched successfully",
            json!(ProfileData {
                id: user.id,
                username: user.username,
            }),
        ),
        Ok(None) => {
            // The token verified but its subject no longer exists.
            error!("authenticated user {} not found", principal.user_id);
            response::internal_error("User not found")
        }
        Err(err) => {
            error!("failed to fetch profile: {err}");
            response::internal_error("Failed to fetch profile")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found"),
        (status = 400, description = "Malformed user id"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No user with that id"),
    ),
    tag = "users"
)]
pub async fn get_user(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
) -> Response {
    if let Err(rejection) = require_auth(&headers, &pool, &auth_config).await {
        return rejection;
    }

    let Ok(user_id) = Uuid::parse_str(id.trim()) else {
        return response::bad_request("Invalid user id");
    };

    match fetch_user(&pool, user_id).await {
        Ok(Some(user)) => response::success(
            "User retrieved successfully",
            json!({
                "id": user.id,
                "username": user.username,
                "created_at": user.created_at,
                "updated_at": user.updated_at,
            }),
        ),
        Ok(None) => response::not_found("User not found"),
        Err(err) => {
            error!("failed to fetch user: {err}");
            response::internal_error("Failed to fetch user")
        }
    }
}

async fn fetch_user(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    let query = r#"
        SELECT
            id::text AS id,
            username,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
            to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
        FROM users
        WHERE id = $1
        LIMIT 1
    "#;
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;
    Ok(row.map(|row| UserRow {
        id: row.get("id"),
        username: row.get("username"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }))
}
