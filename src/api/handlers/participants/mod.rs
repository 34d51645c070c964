//! Participant CRUD endpoints.
//!
//! Registration (`POST`) is public so participants can sign themselves up;
//! everything else requires an authenticated principal.

mod storage;
pub mod types;

use axum::{
    extract::{Extension, Path, Query},
    http::HeaderMap,
    response::Response,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use super::auth::{require_auth, AuthConfig};
use super::response;
use types::{ListParams, ListQuery, ParticipantForm};

#[utoipa::path(
    post,
    path = "/api/participants",
    request_body = ParticipantForm,
    responses(
        (status = 201, description = "Participant created", body = storage::ParticipantRecord),
        (status = 400, description = "Missing payload or failed validation"),
    ),
    tag = "participants"
)]
pub async fn create_participant(
    pool: Extension<PgPool>,
    payload: Option<axum::Json<ParticipantForm>>,
) -> Response {
    let Some(axum::Json(form)) = payload else {
        return response::bad_request("Missing participant payload");
    };
    if let Err(message) = form.validate() {
        return response::bad_request(message);
    }

    match storage::insert_participant(&pool, &form).await {
        Ok(record) => response::created(
            "Participant created successfully",
            json!(record),
        ),
        Err(err) => {
            error!("failed to create participant: {err}");
            response::internal_error("Failed to create participant")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/participants",
    params(
        ("page" = Option<String>, Query, description = "Page number, default 1"),
        ("limit" = Option<String>, Query, description = "Page size, default 10, max 100"),
        ("search" = Option<String>, Query, description = "Case-insensitive name filter"),
        ("sort_by" = Option<String>, Query, description = "Sort column (allow-listed)"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "Page of participants with pagination metadata"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "participants"
)]
pub async fn list_participants(
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
) -> Response {
    if let Err(rejection) = require_auth(&headers, &pool, &auth_config).await {
        return rejection;
    }

    let params = ListParams::from_query(&query);
    match storage::list_participants(&pool, &params).await {
        Ok((participants, total)) => {
            let total_pages = if total == 0 {
                0
            } else {
                (total + params.limit - 1) / params.limit
            };
            response::success(
                "Participants retrieved successfully",
                json!({
                    "participants": participants,
                    "pagination": {
                        "current_page": params.page,
                        "per_page": params.limit,
                        "total_items": total,
                        "total_pages": total_pages,
                        "has_next": params.page < total_pages,
                        "has_prev": params.page > 1,
                    },
                    "filters": {
                        "search": params.search,
                        "sort_by": params.sort_by,
                        "sort_order": params.sort_order,
                    },
                }),
            )
        }
        Err(err) => {
            error!("failed to list participants: {err}");
            response::internal_error("Failed to list participants")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/participants/count",
    responses(
        (status = 200, description = "Total number of participants"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "participants"
)]
pub async fn count_participants(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
) -> Response {
    if let Err(rejection) = require_auth(&headers, &pool, &auth_config).await {
        return rejection;
    }

    match storage::count_participants(&pool).await {
        Ok(total) => response::success(
            "Total participants counted successfully",
            json!({ "total": total }),
        ),
        Err(err) => {
            error!("failed to count participants: {err}");
            response::internal_error("Failed to count participants")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/participants/{id}",
    params(("id" = String, Path, description = "Participant id")),
    responses(
        (status = 200, description = "Participant found", body = storage::ParticipantRecord),
        (status = 400, description = "Malformed participant id"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No participant with that id"),
    ),
    tag = "participants"
)]
pub async fn get_participant(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
) -> Response {
    if let Err(rejection) = require_auth(&headers, &pool, &auth_config).await {
        return rejection;
    }

    let Ok(participant_id) = Uuid::parse_str(id.trim()) else {
        return response::bad_request("Invalid participant id");
    };

    match storage::fetch_participant(&pool, participant_id).await {
        Ok(Some(record)) => {
            response::success("Participant retrieved successfully", json!(record))
        }
        Ok(None) => response::not_found("Participant not found"),
        Err(err) => {
            error!("failed to fetch participant: {err}");
            response::internal_error("Failed to fetch participant")
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/participants/{id}",
    params(("id" = String, Path, description = "Participant id")),
    request_body = ParticipantForm,
    responses(
        (status = 200, description = "Participant updated", body = storage::ParticipantRecord),
        (status = 400, description = "Malformed id, missing payload, or failed validation"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No participant with that id"),
    ),
    tag = "participants"
)]
pub async fn update_participant(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
    payload: Option<axum::Json<ParticipantForm>>,
) -> Response {
    if let Err(rejection) = require_auth(&headers, &pool, &auth_config).await {
        return rejection;
    }

    let Ok(participant_id) = Uuid::parse_str(id.trim()) else {
        return response::bad_request("Invalid participant id");
    };

    let Some(axum::Json(form)) = payload else {
        return response::bad_request("Missing participant payload");
    };
    if let Err(message) = form.validate() {
        return response::bad_request(message);
    }

    match storage::update_participant(&pool, participant_id, &form).await {
        Ok(Some(record)) => response::success("Participant updated successfully", json!(record)),
        Ok(None) => response::not_found("Participant not found"),
        Err(err) => {
            error!("failed to update participant: {err}");
            response::internal_error("Failed to update participant")
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/participants/{id}",
    params(("id" = String, Path, description = "Participant id")),
    responses(
        (status = 200, description = "Participant deleted"),
        (status = 400, description = "Malformed participant id"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No participant with that id"),
    ),
    tag = "participants"
)]
pub async fn delete_participant(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_config: Extension<Arc<AuthConfig>>,
) -> Response {
    if let Err(rejection) = require_auth(&headers, &pool, &auth_config).await {
        return rejection;
    }

    let Ok(participant_id) = Uuid::parse_str(id.trim()) else {
        return response::bad_request("Invalid participant id");
    };

    match storage::delete_participant(&pool, participant_id).await {
        Ok(true) => response::success("Participant deleted successfully", json!(null)),
        Ok(false) => response::not_found("Participant not found"),
        Err(err) => {
            error!("failed to delete participant: {err}");
            response::internal_error("Failed to delete participant")
        }
    }
}
