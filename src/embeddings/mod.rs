// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! CLIP embedding core
//!
//! This module provides:
//! - Device resolution and ONNX Runtime execution providers
//! - Model file resolution (local paths or Hugging Face Hub)
//! - The CLIP encoder pair behind the [`ClipEncoder`] seam
//! - Caption tokenization at a fixed context length
//! - L2 normalization of raw encoder output

pub mod device;
pub mod encoder;
pub mod errors;
pub mod model_files;
pub mod model_host;
pub mod normalizer;
pub mod onnx_model;
pub mod tokenizer;

pub use device::{cuda_available, Device, DeviceStrategy};
pub use encoder::ClipEncoder;
pub use errors::EmbeddingError;
pub use model_files::{ModelFiles, ModelSource, DEFAULT_IMAGE_MODEL_REPO, DEFAULT_TEXT_MODEL_REPO};
pub use model_host::{ModelHost, ModelHostConfig};
pub use normalizer::{cosine_similarity, l2_norm, normalize, EmbeddingResult};
pub use onnx_model::{EncoderSettings, OnnxClipEncoder};
pub use tokenizer::{CaptionTokenizer, TokenBatch, CLIP_CONTEXT_LENGTH};
