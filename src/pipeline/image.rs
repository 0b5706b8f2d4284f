// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Image Pipeline

use crate::embeddings::{normalize, EmbeddingError, EmbeddingResult, ModelHost};
use crate::vision::decode_image_bytes;
use tracing::debug;

/// Embeds one uploaded image
///
/// # Errors
/// - `InvalidImage` if the bytes are empty, over the host's upload limit,
///   of an unknown format, or fail to decode
/// - `Inference` / `DegenerateEmbedding` from the encoder and normalizer
pub fn embed_image(host: &ModelHost, bytes: &[u8]) -> Result<EmbeddingResult, EmbeddingError> {
    let (image, info) = decode_image_bytes(bytes, host.max_image_bytes())?;
    debug!(
        width = info.width,
        height = info.height,
        format = ?info.format,
        "Decoded image"
    );

    let pixels = host.preprocessor().preprocess(&image);
    let raw = host.encode_image(pixels)?;
    normalize(raw)
}
