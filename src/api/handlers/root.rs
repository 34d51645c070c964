use axum::response::{IntoResponse, Json};
use serde_json::json;

// axum handler for the service index
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": {
                "login": "POST /api/login",
                "refresh": "POST /api/refresh",
                "logout": "POST /api/logout (protected)",
                "profile": "GET /api/admin/profile (protected)",
            },
            "participants": {
                "create": "POST /api/participants",
                "list": "GET /api/participants (protected)",
                "count": "GET /api/participants/count (protected)",
                "get": "GET /api/participants/{id} (protected)",
                "update": "PUT /api/participants/{id} (protected)",
                "delete": "DELETE /api/participants/{id} (protected)",
            },
            "health": "GET /health",
        },
    }))
}
