// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response body shared by POST /embed/image and POST /embed/caption

use crate::embeddings::EmbeddingResult;
use serde::{Deserialize, Serialize};

/// Response body of both embedding endpoints
///
/// # Fields
/// - `size`: Number of components in `embedding` (512 for ViT-B/32)
/// - `embedding`: Unit-length (L2) embedding vector
///
/// # Example
/// ```json
/// {
///   "size": 512,
///   "embedding": [0.0123, -0.0441, ...]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub size: usize,
    pub embedding: Vec<f32>,
}

impl From<EmbeddingResult> for EmbedResponse {
    fn from(result: EmbeddingResult) -> Self {
        Self {
            size: result.size,
            embedding: result.embedding,
        }
    }
}
