// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy of the embedding core

use crate::vision::ImageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Uploaded bytes are empty, oversized, not an image, or corrupt
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ImageError),

    /// The tokenizer rejected the caption (e.g. longer than the context length)
    #[error("Invalid caption: {0}")]
    InvalidCaption(String),

    /// Encoder produced a zero-norm or non-finite vector
    #[error("Degenerate embedding: {0}")]
    DegenerateEmbedding(String),

    /// Model weights, tokenizer, or device could not be initialized
    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    /// ONNX Runtime failed while running an encoder
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl EmbeddingError {
    /// Input-validation failures the caller can fix by changing its request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EmbeddingError::InvalidImage(_) | EmbeddingError::InvalidCaption(_)
        )
    }

    pub(crate) fn inference<E: std::fmt::Display>(err: E) -> Self {
        EmbeddingError::Inference(err.to_string())
    }
}
