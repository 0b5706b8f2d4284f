// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /, GET /health and routing tests

use crate::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_root_returns_service_message() {
    let response = test_app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json, serde_json::json!({ "msg": "This is Embedding Service" }));
}

#[tokio::test]
async fn test_health_reports_model_and_device() {
    let response = test_app().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model"], "test-clip");
    assert_eq!(json["device"], "cpu");
    assert_eq!(json["dimension"], TEST_DIMENSION);
    assert_eq!(json["version"], clip_embed_node::version::VERSION_NUMBER);
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), clip_embed_node::version::FEATURES.len());
    assert!(features.iter().any(|f| f == "image-embeddings"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_app().oneshot(get("/v1/embed")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["error_type"], "not_found");
}

#[tokio::test]
async fn test_get_on_embed_route_is_405() {
    let response = test_app().oneshot(get("/embed/caption")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
