//! Protected-route convention: endpoints requiring authentication reject
//! with 401 before any handler logic runs. These requests short-circuit on
//! the missing token, so a lazy (never-connected) pool is enough.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Extension, Router,
};
use registro::api::{handlers::auth::AuthConfig, router};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    // connect_lazy never opens a connection; any test that reached the
    // database would fail loudly with a 500 instead of passing.
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://registro@localhost:5432/registro")
        .expect("lazy pool");
    let auth_config = Arc::new(AuthConfig::new(SecretString::from(
        "integration-test-secret".to_string(),
    )));

    let (router, _openapi) = router().split_for_parts();
    router
        .layer(Extension(auth_config))
        .layer(Extension(pool))
}

#[tokio::test]
async fn protected_routes_reject_requests_without_a_token() {
    let cases = [
        ("POST", "/api/logout"),
        ("GET", "/api/admin/profile"),
        ("GET", "/api/users/5f64c5f2-5f54-4ba6-a0d1-5f8ef1a7a1aa"),
        ("GET", "/api/participants"),
        ("GET", "/api/participants/count"),
        ("GET", "/api/participants/5f64c5f2-5f54-4ba6-a0d1-5f8ef1a7a1aa"),
        ("PUT", "/api/participants/5f64c5f2-5f54-4ba6-a0d1-5f8ef1a7a1aa"),
        ("DELETE", "/api/participants/5f64c5f2-5f54-4ba6-a0d1-5f8ef1a7a1aa"),
    ];

    for (method, uri) in cases {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        let response = app().oneshot(request).await.expect("response");
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should 401 without a token"
        );
    }
}

#[tokio::test]
async fn refresh_without_cookie_is_unauthorized() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/refresh")
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_without_payload_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_participant_rejects_missing_payload() {
    // Registration is public, so the 400 comes from payload validation,
    // not authentication.
    let request = Request::builder()
        .method("POST")
        .uri("/api/participants")
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
