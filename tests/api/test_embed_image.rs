// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed/image endpoint tests
//!
//! Exercise the full router (multipart extraction, pipeline, response
//! mapping) against the deterministic in-process encoder.

use crate::common::*;
use axum::http::StatusCode;
use clip_embed_node::embed_image;
use tower::ServiceExt;

#[tokio::test]
async fn test_png_upload_returns_unit_embedding() {
    let response = test_app()
        .oneshot(image_request("file", &png_bytes(48, 32, [200, 40, 90])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;

    let size = json["size"].as_u64().unwrap() as usize;
    let embedding: Vec<f32> = serde_json::from_value(json["embedding"].clone()).unwrap();
    assert_eq!(size, TEST_DIMENSION);
    assert_eq!(size, embedding.len());
    assert!((l2_norm(&embedding) - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_jpeg_upload_accepted() {
    let response = test_app()
        .oneshot(image_request("file", &jpeg_bytes(64, 64, [10, 200, 30])))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["size"], TEST_DIMENSION);
}

#[tokio::test]
async fn test_response_matches_pipeline() {
    let bytes = split_png_bytes(40, 24, [255, 0, 0], [0, 0, 255]);
    let expected = embed_image(&test_host(), &bytes).unwrap();

    let response = test_app()
        .oneshot(image_request("file", &bytes))
        .await
        .unwrap();
    let json = json_body(response).await;
    let embedding: Vec<f32> = serde_json::from_value(json["embedding"].clone()).unwrap();

    assert_eq!(embedding, expected.embedding);
}

#[tokio::test]
async fn test_different_images_differ() {
    let red = embed_image(&test_host(), &png_bytes(32, 32, [255, 0, 0])).unwrap();
    let blue = embed_image(&test_host(), &png_bytes(32, 32, [0, 0, 255])).unwrap();
    assert_ne!(red.embedding, blue.embedding);
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let image = png_bytes(20, 20, [1, 2, 3]);

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n");
    body.extend_from_slice(&multipart_body("file", "image.png", &image));

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/embed/image")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        )
        .body(axum::body::Body::from(body))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
