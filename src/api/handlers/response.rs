//! Uniform JSON envelope shared by every endpoint.
//!
//! Success: `{"success": true, "message": ..., "data": ...}`.
//! Failure: `{"success": false, "error": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

pub(crate) fn success_body(message: &str, data: Value) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "data": data,
    }))
}

pub(crate) fn error_body(message: &str) -> Json<Value> {
    Json(json!({
        "success": false,
        "error": message,
    }))
}

pub(crate) fn success(message: &str, data: Value) -> Response {
    (StatusCode::OK, success_body(message, data)).into_response()
}

pub(crate) fn created(message: &str, data: Value) -> Response {
    (StatusCode::CREATED, success_body(message, data)).into_response()
}

pub(crate) fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, error_body(message)).into_response()
}

pub(crate) fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, error_body(message)).into_response()
}

pub(crate) fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, error_body(message)).into_response()
}

pub(crate) fn internal_error(message: &str) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, error_body(message)).into_response()
}
