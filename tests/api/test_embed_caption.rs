// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed/caption endpoint tests

use crate::common::*;
use axum::http::StatusCode;
use tower::ServiceExt;

async fn embed(caption: &str) -> (StatusCode, serde_json::Value) {
    let response = test_app().oneshot(caption_request(caption)).await.unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

fn embedding_of(json: &serde_json::Value) -> Vec<f32> {
    serde_json::from_value(json["embedding"].clone()).unwrap()
}

#[tokio::test]
async fn test_caption_returns_unit_embedding() {
    let (status, json) = embed("a dog on the beach").await;

    assert_eq!(status, StatusCode::OK);
    let embedding = embedding_of(&json);
    assert_eq!(json["size"], TEST_DIMENSION);
    assert_eq!(embedding.len(), TEST_DIMENSION);
    assert!((l2_norm(&embedding) - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_same_caption_is_deterministic() {
    let (_, first) = embed("a photo of a cat").await;
    let (_, second) = embed("a photo of a cat").await;
    assert_eq!(embedding_of(&first), embedding_of(&second));
}

#[tokio::test]
async fn test_different_captions_differ() {
    let (_, dog) = embed("a dog").await;
    let (_, cat) = embed("a cat").await;
    assert_ne!(embedding_of(&dog), embedding_of(&cat));
}

#[tokio::test]
async fn test_empty_caption_is_well_formed() {
    let (status, json) = embed("").await;

    assert_eq!(status, StatusCode::OK);
    let embedding = embedding_of(&json);
    assert_eq!(json["size"], TEST_DIMENSION);
    assert_eq!(embedding.len(), TEST_DIMENSION);
    assert!((l2_norm(&embedding) - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_caption_at_context_length_accepted() {
    let caption = vec!["dog"; TEST_CONTEXT_LENGTH].join(" ");
    let (status, _) = embed(&caption).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_words_still_embed() {
    let (status, json) = embed("zebra crossing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["size"], TEST_DIMENSION);
}
