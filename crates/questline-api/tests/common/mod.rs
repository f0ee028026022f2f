//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use questline_narrative::domain::catalog::PhaseCatalog;
use questline_test_support::FixedClock;
use tower::ServiceExt;

use questline_api::state::AppState;

/// Build the full app router over the built-in catalog and a fixed clock.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with_catalog(PhaseCatalog::builtin().unwrap())
}

/// Build the full app router over a custom catalog.
pub fn build_test_app_with_catalog(catalog: PhaseCatalog) -> Router {
    let app_state = AppState::new(Arc::new(catalog), Arc::new(FixedClock::default()));
    questline_api::build_router(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Body of a non-JSON response is returned as `Value::Null`.
async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}
