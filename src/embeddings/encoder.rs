// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! The seam between the pipelines and the inference runtime

use crate::embeddings::{EmbeddingError, TokenBatch};
use ndarray::Array4;

/// A pretrained image/text encoder pair sharing one embedding space
///
/// Implementations run inference only and must not keep per-call state:
/// the same input always yields the same raw vector. Outputs are *not*
/// normalized; the pipelines normalize them.
pub trait ClipEncoder: Send + Sync {
    /// Runs the vision encoder on a `[1, 3, H, W]` tensor
    fn encode_image(&self, pixels: Array4<f32>) -> Result<Vec<f32>, EmbeddingError>;

    /// Runs the text encoder on a tokenized caption
    fn encode_text(&self, tokens: &TokenBatch) -> Result<Vec<f32>, EmbeddingError>;

    /// Dimensionality of the vectors both encoders emit
    fn dimension(&self) -> usize;
}
