// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Interleaved concurrent requests against one shared model host
//!
//! Every response must equal the sequential result for its own input.

use crate::common::*;
use axum::http::StatusCode;
use clip_embed_node::{embed_image, embed_text, ModelHost};
use std::sync::Arc;
use futures_util::future::join_all;
use tower::ServiceExt;

enum Input {
    Image(Vec<u8>),
    Caption(&'static str),
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interleaved_image_and_caption_requests() {
    assert_matches_sequential(test_host()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_encoder_state_is_not_interleaved() {
    let host = Arc::new(host_with(Arc::new(ScratchEncoder::default())));
    for _ in 0..4 {
        assert_matches_sequential(host.clone()).await;
    }
}

/// Sends interleaved image and caption requests at once and compares each
/// response with the sequential pipeline result for the same input
async fn assert_matches_sequential(host: Arc<ModelHost>) {
    let app = app_with_host((*host).clone());

    let captions = ["a dog", "a cat on the beach", "", "a photo of a red dog"];
    let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [90, 90, 10]];

    let mut inputs = Vec::new();
    for (caption, color) in captions.iter().zip(colors.iter()) {
        inputs.push(Input::Image(png_bytes(24, 18, *color)));
        inputs.push(Input::Caption(*caption));
    }

    let expected: Vec<Vec<f32>> = inputs
        .iter()
        .map(|input| match input {
            Input::Image(bytes) => embed_image(&host, bytes).unwrap().embedding,
            Input::Caption(caption) => embed_text(&host, caption).unwrap().embedding,
        })
        .collect();

    let tasks = inputs.into_iter().map(|input| {
        let app = app.clone();
        tokio::spawn(async move {
            let request = match input {
                Input::Image(bytes) => image_request("file", &bytes),
                Input::Caption(caption) => caption_request(caption),
            };
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let json = json_body(response).await;
            serde_json::from_value::<Vec<f32>>(json["embedding"].clone()).unwrap()
        })
    });

    let results = join_all(tasks).await;
    for (result, expected) in results.into_iter().zip(expected) {
        assert_eq!(result.unwrap(), expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failures_do_not_affect_concurrent_successes() {
    let app = test_app();

    let bad = app.clone().oneshot(image_request("file", b"not an image"));
    let good = app.clone().oneshot(caption_request("a dog"));
    let (bad, good) = tokio::join!(bad, good);

    assert_eq!(bad.unwrap().status(), StatusCode::BAD_REQUEST);
    assert_eq!(good.unwrap().status(), StatusCode::OK);
}
