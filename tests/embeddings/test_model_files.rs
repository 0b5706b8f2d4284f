// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model file resolution and startup failure tests

use clip_embed_node::embeddings::{
    DeviceStrategy, EmbeddingError, ModelFiles, ModelHost, ModelHostConfig, ModelSource,
};
use std::fs;

#[tokio::test]
async fn test_local_files_resolve_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let vision = dir.path().join("vision.onnx");
    let text = dir.path().join("text.onnx");
    let tokenizer = dir.path().join("tokenizer.json");
    fs::write(&vision, b"onnx").unwrap();
    fs::write(&text, b"onnx").unwrap();
    fs::write(&tokenizer, b"{}").unwrap();

    let files = ModelFiles::resolve(&ModelSource {
        image_model_path: Some(vision.clone()),
        text_model_path: Some(text.clone()),
        tokenizer_path: Some(tokenizer.clone()),
        ..ModelSource::default()
    })
    .await
    .unwrap();

    assert_eq!(files.image_model, vision);
    assert_eq!(files.text_model, text);
    assert_eq!(files.tokenizer, tokenizer);
}

#[tokio::test]
async fn test_invalid_tokenizer_is_model_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let vision = dir.path().join("vision.onnx");
    let text = dir.path().join("text.onnx");
    let tokenizer = dir.path().join("tokenizer.json");
    fs::write(&vision, b"onnx").unwrap();
    fs::write(&text, b"onnx").unwrap();
    fs::write(&tokenizer, b"not json").unwrap();

    let config = ModelHostConfig {
        device: DeviceStrategy::Cpu,
        source: ModelSource {
            image_model_path: Some(vision),
            text_model_path: Some(text),
            tokenizer_path: Some(tokenizer),
            ..ModelSource::default()
        },
        ..ModelHostConfig::default()
    };

    let err = ModelHost::load(config).await.unwrap_err();
    assert!(matches!(err, EmbeddingError::ModelLoad(_)));
}

#[tokio::test]
async fn test_invalid_config_fails_before_loading() {
    let config = ModelHostConfig {
        intra_threads: 0,
        ..ModelHostConfig::default()
    };

    let err = ModelHost::load(config).await.unwrap_err();
    match err {
        EmbeddingError::ModelLoad(msg) => assert!(msg.contains("Intra threads")),
        other => panic!("Expected ModelLoad, got {:?}", other),
    }
}
