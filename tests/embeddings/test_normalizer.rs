// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Normalizer tests: every returned vector is unit length, degenerate
//! encoder output never leaks NaN/Inf.

use clip_embed_node::embeddings::{cosine_similarity, l2_norm, normalize, EmbeddingError};

#[test]
fn test_typical_clip_vector_normalizes() {
    // Magnitudes similar to raw ViT-B/32 projections
    let raw: Vec<f32> = (0..512).map(|i| ((i as f32) * 0.37).sin() * 0.8).collect();
    let result = normalize(raw.clone()).unwrap();

    assert_eq!(result.size, 512);
    assert_eq!(result.embedding.len(), 512);
    assert!((l2_norm(&result.embedding) - 1.0).abs() < 1e-5);
    // Direction is preserved
    assert!((cosine_similarity(&raw, &result.embedding) - 1.0).abs() < 1e-5);
}

#[test]
fn test_tiny_and_huge_magnitudes() {
    let tiny = normalize(vec![1e-20, 2e-20, 2e-20]).unwrap();
    assert!((l2_norm(&tiny.embedding) - 1.0).abs() < 1e-5);

    let huge = normalize(vec![3e30, 4e30]).unwrap();
    assert!((l2_norm(&huge.embedding) - 1.0).abs() < 1e-5);
    assert!(huge.embedding.iter().all(|v| v.is_finite()));
}

#[test]
fn test_already_unit_vector_is_unchanged() {
    let result = normalize(vec![0.0, 1.0, 0.0]).unwrap();
    assert_eq!(result.embedding, vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_zero_vector_is_degenerate() {
    assert!(matches!(
        normalize(vec![0.0; 512]),
        Err(EmbeddingError::DegenerateEmbedding(_))
    ));
}

#[test]
fn test_non_finite_components_are_degenerate() {
    assert!(matches!(
        normalize(vec![1.0, f32::NAN]),
        Err(EmbeddingError::DegenerateEmbedding(_))
    ));
    assert!(matches!(
        normalize(vec![f32::NEG_INFINITY, 1.0]),
        Err(EmbeddingError::DegenerateEmbedding(_))
    ));
}

#[test]
fn test_empty_vector_is_degenerate() {
    assert!(matches!(
        normalize(Vec::new()),
        Err(EmbeddingError::DegenerateEmbedding(_))
    ));
}

#[test]
fn test_result_serializes_size_and_embedding() {
    let result = normalize(vec![3.0, 4.0]).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["size"], 2);
    assert_eq!(json["embedding"].as_array().unwrap().len(), 2);
}
