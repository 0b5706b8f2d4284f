// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Text Pipeline

use crate::embeddings::{normalize, EmbeddingError, EmbeddingResult, ModelHost};
use tracing::debug;

/// Embeds one caption
///
/// The empty caption is valid and embeds like any other.
///
/// # Errors
/// - `InvalidCaption` if the tokenizer fails or the caption does not fit
///   the context length
/// - `Inference` / `DegenerateEmbedding` from the encoder and normalizer
pub fn embed_text(host: &ModelHost, caption: &str) -> Result<EmbeddingResult, EmbeddingError> {
    let tokens = host.tokenizer().tokenize(caption)?;
    debug!(
        tokens = tokens.token_count(),
        context_length = tokens.context_length(),
        "Tokenized caption"
    );

    let raw = host.encode_text(&tokens)?;
    normalize(raw)
}
