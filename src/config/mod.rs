// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! Every setting is a command-line flag that can also come from the
//! environment (and so from a `.env` file loaded before parsing).

use crate::embeddings::{
    DeviceStrategy, EmbeddingError, ModelHostConfig, ModelSource, DEFAULT_IMAGE_MODEL_REPO,
    DEFAULT_TEXT_MODEL_REPO,
};
use crate::vision::DEFAULT_MAX_IMAGE_BYTES;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// CLIP embedding node
#[derive(Parser, Debug, Clone)]
#[command(name = "clip-embed-node")]
#[command(version)]
#[command(about = "Serves CLIP image and caption embeddings over HTTP", long_about = None)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    #[arg(long, env = "API_LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: SocketAddr,

    /// Compute device: auto, cpu or cuda
    #[arg(long, env = "EMBED_DEVICE", value_enum, default_value_t = DeviceStrategy::Auto)]
    pub device: DeviceStrategy,

    /// Model name reported by /health
    #[arg(long, env = "CLIP_MODEL_NAME", default_value = "ViT-B/32")]
    pub model_name: String,

    /// Local vision encoder ONNX file (fetched from the hub when unset)
    #[arg(long, env = "CLIP_IMAGE_MODEL_PATH")]
    pub image_model_path: Option<PathBuf>,

    /// Local text encoder ONNX file (fetched from the hub when unset)
    #[arg(long, env = "CLIP_TEXT_MODEL_PATH")]
    pub text_model_path: Option<PathBuf>,

    /// Local tokenizer.json (fetched from the hub when unset)
    #[arg(long, env = "CLIP_TOKENIZER_PATH")]
    pub tokenizer_path: Option<PathBuf>,

    #[arg(long, env = "CLIP_IMAGE_MODEL_REPO", default_value = DEFAULT_IMAGE_MODEL_REPO)]
    pub image_model_repo: String,

    #[arg(long, env = "CLIP_TEXT_MODEL_REPO", default_value = DEFAULT_TEXT_MODEL_REPO)]
    pub text_model_repo: String,

    /// Overrides the Hugging Face cache directory
    #[arg(long, env = "CLIP_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Embedding dimension both encoders must emit
    #[arg(long, env = "CLIP_DIMENSION", default_value_t = 512)]
    pub dimension: usize,

    #[arg(long, env = "CLIP_CONTEXT_LENGTH", default_value_t = 77)]
    pub context_length: usize,

    #[arg(long, env = "CLIP_IMAGE_SIZE", default_value_t = 224)]
    pub image_size: u32,

    /// ONNX Runtime intra-op threads per session
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Largest accepted image upload in bytes
    #[arg(long, env = "MAX_IMAGE_BYTES", default_value_t = DEFAULT_MAX_IMAGE_BYTES)]
    pub max_image_bytes: usize,
}

impl ServiceConfig {
    /// Model host settings derived from this configuration
    pub fn model_host_config(&self) -> ModelHostConfig {
        ModelHostConfig {
            model_name: self.model_name.clone(),
            device: self.device,
            source: ModelSource {
                image_model_path: self.image_model_path.clone(),
                text_model_path: self.text_model_path.clone(),
                tokenizer_path: self.tokenizer_path.clone(),
                image_model_repo: self.image_model_repo.clone(),
                text_model_repo: self.text_model_repo.clone(),
                cache_dir: self.cache_dir.clone(),
            },
            dimension: self.dimension,
            context_length: self.context_length,
            image_size: self.image_size,
            intra_threads: self.intra_threads,
            max_image_bytes: self.max_image_bytes,
        }
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.model_name.trim().is_empty() {
            return Err(EmbeddingError::ModelLoad(
                "Model name cannot be empty".to_string(),
            ));
        }
        self.model_host_config().validate()
    }
}
