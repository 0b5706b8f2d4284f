// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Caption tokenization for the CLIP text encoder
//!
//! Captions are encoded with the model's paired BPE tokenizer and laid out
//! as a fixed-length `[1, context_length]` batch. Captions that do not fit
//! are rejected instead of being silently truncated.

use crate::embeddings::EmbeddingError;
use anyhow::{anyhow, Context, Result};
use ndarray::Array2;
use std::path::Path;
use std::sync::Arc;
use tokenizers::Tokenizer;

/// Context length of the ViT-B/32 text encoder
pub const CLIP_CONTEXT_LENGTH: usize = 77;

/// A single tokenized caption, padded to the context length
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBatch {
    /// Token ids, shape `[1, context_length]`
    pub input_ids: Array2<i64>,
    /// 1 for real tokens, 0 for padding, shape `[1, context_length]`
    pub attention_mask: Array2<i64>,
}

impl TokenBatch {
    pub fn context_length(&self) -> usize {
        self.input_ids.ncols()
    }

    /// Number of non-padding tokens
    pub fn token_count(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m != 0).count()
    }
}

/// Tokenizer paired with the text encoder
#[derive(Clone)]
pub struct CaptionTokenizer {
    tokenizer: Arc<Tokenizer>,
    context_length: usize,
    pad_id: u32,
}

impl std::fmt::Debug for CaptionTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionTokenizer")
            .field("context_length", &self.context_length)
            .field("pad_id", &self.pad_id)
            .finish_non_exhaustive()
    }
}

impl CaptionTokenizer {
    /// Loads a `tokenizer.json` from disk
    pub fn from_file<P: AsRef<Path>>(path: P, context_length: usize) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", path.display());
        }

        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;

        Self::new(tokenizer, context_length)
            .with_context(|| format!("Invalid tokenizer at {}", path.display()))
    }

    /// Builds a tokenizer from serialized `tokenizer.json` contents
    pub fn from_bytes(bytes: &[u8], context_length: usize) -> Result<Self> {
        let tokenizer = Tokenizer::from_bytes(bytes)
            .map_err(|e| anyhow!("Failed to parse tokenizer: {}", e))?;
        Self::new(tokenizer, context_length)
    }

    /// Wraps a tokenizer, taking over its padding and truncation
    ///
    /// The pad id configured in the tokenizer is kept (0 when none is set);
    /// tokenizer-side padding and truncation are disabled so over-long
    /// captions can be detected.
    pub fn new(mut tokenizer: Tokenizer, context_length: usize) -> Result<Self> {
        if context_length == 0 {
            anyhow::bail!("Context length must be greater than 0");
        }

        let pad_id = tokenizer.get_padding().map(|p| p.pad_id).unwrap_or(0);

        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(None)
            .map_err(|e| anyhow!("Failed to disable truncation: {}", e))?;

        Ok(Self {
            tokenizer: Arc::new(tokenizer),
            context_length,
            pad_id,
        })
    }

    pub fn context_length(&self) -> usize {
        self.context_length
    }

    pub fn pad_id(&self) -> u32 {
        self.pad_id
    }

    /// Tokenizes one caption into a `[1, context_length]` batch
    ///
    /// # Errors
    /// `EmbeddingError::InvalidCaption` if the tokenizer fails or the
    /// caption needs more tokens than the context length allows.
    /// The empty caption is valid.
    pub fn tokenize(&self, caption: &str) -> Result<TokenBatch, EmbeddingError> {
        let encoding = self
            .tokenizer
            .encode(caption, true)
            .map_err(|e| EmbeddingError::InvalidCaption(format!("Tokenization failed: {}", e)))?;

        let ids = encoding.get_ids();
        if ids.len() > self.context_length {
            return Err(EmbeddingError::InvalidCaption(format!(
                "Input is too long for context length {} ({} tokens)",
                self.context_length,
                ids.len()
            )));
        }

        let mut input_ids = vec![self.pad_id as i64; self.context_length];
        let mut attention_mask = vec![0i64; self.context_length];
        for (i, &id) in ids.iter().enumerate() {
            input_ids[i] = id as i64;
            attention_mask[i] = 1;
        }

        let input_ids = Array2::from_shape_vec((1, self.context_length), input_ids)
            .map_err(|e| EmbeddingError::InvalidCaption(e.to_string()))?;
        let attention_mask = Array2::from_shape_vec((1, self.context_length), attention_mask)
            .map_err(|e| EmbeddingError::InvalidCaption(e.to_string()))?;

        Ok(TokenBatch {
            input_ids,
            attention_mask,
        })
    }
}
