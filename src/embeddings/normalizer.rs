// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding normalization and serialization
//!
//! Both pipelines finish here: the raw encoder output is scaled to unit
//! L2 length and materialized as an [`EmbeddingResult`].

use crate::embeddings::EmbeddingError;
use serde::{Deserialize, Serialize};

/// A unit-length embedding together with its dimensionality
///
/// # Example
/// ```json
/// {
///   "size": 512,
///   "embedding": [0.012, -0.044, ...]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResult {
    /// Number of components in `embedding`
    pub size: usize,

    /// L2-normalized embedding vector
    pub embedding: Vec<f32>,
}

/// Scales `raw` to unit L2 length
///
/// # Errors
/// Returns `EmbeddingError::DegenerateEmbedding` if the vector is empty,
/// contains NaN/Inf, or has a norm of exactly zero.
pub fn normalize(raw: Vec<f32>) -> Result<EmbeddingResult, EmbeddingError> {
    if raw.is_empty() {
        return Err(EmbeddingError::DegenerateEmbedding(
            "encoder returned an empty vector".to_string(),
        ));
    }

    if let Some(index) = raw.iter().position(|v| !v.is_finite()) {
        return Err(EmbeddingError::DegenerateEmbedding(format!(
            "component {} is not finite ({})",
            index, raw[index]
        )));
    }

    // Accumulate in f64 so large 512-d vectors keep their precision
    let norm = raw
        .iter()
        .map(|&v| (v as f64) * (v as f64))
        .sum::<f64>()
        .sqrt();

    if norm == 0.0 {
        return Err(EmbeddingError::DegenerateEmbedding(
            "embedding has zero L2 norm".to_string(),
        ));
    }

    let embedding: Vec<f32> = raw.iter().map(|&v| (v as f64 / norm) as f32).collect();

    Ok(EmbeddingResult {
        size: embedding.len(),
        embedding,
    })
}

/// Euclidean length of a vector
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity between two embeddings (0.0 for mismatched or zero vectors)
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
