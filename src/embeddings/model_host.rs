// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model Host
//!
//! Owns everything the pipelines need from the pretrained model: the
//! resolved device, the encoder pair, the image transform and the
//! tokenizer. Built once at startup and shared read-only (`Arc<ModelHost>`)
//! by every request; nothing in it changes after construction.

use crate::embeddings::{
    CaptionTokenizer, ClipEncoder, Device, DeviceStrategy, EmbeddingError, EncoderSettings,
    ModelFiles, ModelSource, OnnxClipEncoder, TokenBatch, CLIP_CONTEXT_LENGTH,
};
use crate::vision::{ClipPreprocessor, CLIP_INPUT_SIZE, DEFAULT_MAX_IMAGE_BYTES};
use ndarray::Array4;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Everything needed to build a [`ModelHost`]
#[derive(Debug, Clone)]
pub struct ModelHostConfig {
    /// Display name of the model (e.g., "ViT-B/32")
    pub model_name: String,
    /// Device selection strategy, resolved once in [`ModelHost::load`]
    pub device: DeviceStrategy,
    /// Where the ONNX graphs and tokenizer come from
    pub source: ModelSource,
    /// Embedding dimension both encoders must emit
    pub dimension: usize,
    /// Tokenizer context length
    pub context_length: usize,
    /// Vision input resolution
    pub image_size: u32,
    /// ONNX Runtime intra-op threads per session
    pub intra_threads: usize,
    /// Largest accepted image upload in bytes
    pub max_image_bytes: usize,
}

impl Default for ModelHostConfig {
    fn default() -> Self {
        Self {
            model_name: "ViT-B/32".to_string(),
            device: DeviceStrategy::Auto,
            source: ModelSource::default(),
            dimension: 512,
            context_length: CLIP_CONTEXT_LENGTH,
            image_size: CLIP_INPUT_SIZE,
            intra_threads: 4,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl ModelHostConfig {
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        let invalid = |what: &str| {
            Err(EmbeddingError::ModelLoad(format!(
                "{} must be greater than 0",
                what
            )))
        };
        if self.dimension == 0 {
            return invalid("Embedding dimension");
        }
        if self.context_length == 0 {
            return invalid("Context length");
        }
        if self.image_size == 0 {
            return invalid("Image size");
        }
        if self.intra_threads == 0 {
            return invalid("Intra threads");
        }
        if self.max_image_bytes == 0 {
            return invalid("Max image bytes");
        }
        Ok(())
    }
}

/// Read-only context passed into every pipeline invocation
#[derive(Clone)]
pub struct ModelHost {
    model_name: String,
    device: Device,
    encoder: Arc<dyn ClipEncoder>,
    preprocessor: ClipPreprocessor,
    tokenizer: CaptionTokenizer,
    max_image_bytes: usize,
}

impl std::fmt::Debug for ModelHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHost")
            .field("model_name", &self.model_name)
            .field("device", &self.device)
            .field("dimension", &self.dimension())
            .field("preprocessor", &self.preprocessor)
            .field("tokenizer", &self.tokenizer)
            .field("max_image_bytes", &self.max_image_bytes)
            .finish_non_exhaustive()
    }
}

impl ModelHost {
    /// Resolves the device, fetches model files and loads both encoders
    ///
    /// Any failure is `EmbeddingError::ModelLoad`; callers treat it as
    /// fatal and abort startup.
    ///
    /// With `DeviceStrategy::Auto`, a CUDA session that fails to build is
    /// retried once on the CPU.
    ///
    /// # Example
    /// ```ignore
    /// let host = Arc::new(ModelHost::load(ModelHostConfig::default()).await?);
    /// let result = embed_text(&host, "a dog on the beach")?;
    /// assert_eq!(result.size, 512);
    /// ```
    pub async fn load(config: ModelHostConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let device = config.device.resolve()?;
        info!(
            "Loading CLIP model {} (device strategy {:?} -> {})",
            config.model_name, config.device, device
        );

        let files = ModelFiles::resolve(&config.source)
            .await
            .map_err(load_error)?;

        let tokenizer = CaptionTokenizer::from_file(&files.tokenizer, config.context_length)
            .map_err(load_error)?;

        let settings = EncoderSettings {
            device,
            intra_threads: config.intra_threads,
            dimension: config.dimension,
            image_size: config.image_size as usize,
            context_length: config.context_length,
        };

        let (encoder, device) = match load_encoder(files.clone(), settings.clone()).await {
            Ok(encoder) => (encoder, device),
            Err(e) if config.device == DeviceStrategy::Auto && device.is_accelerator() => {
                warn!("⚠️  CUDA encoder initialization failed: {}", e);
                warn!("   Falling back to CPU execution provider");
                let cpu_settings = EncoderSettings {
                    device: Device::Cpu,
                    ..settings
                };
                (load_encoder(files, cpu_settings).await?, Device::Cpu)
            }
            Err(e) => {
                error!("✗ Failed to load CLIP encoders: {}", e);
                return Err(e);
            }
        };

        info!(
            "✓ CLIP model {} ready on {} ({} dimensions)",
            config.model_name, device, config.dimension
        );

        Ok(Self {
            model_name: config.model_name,
            device,
            encoder: Arc::new(encoder),
            preprocessor: ClipPreprocessor::new(config.image_size),
            tokenizer,
            max_image_bytes: config.max_image_bytes,
        })
    }

    /// Assembles a host from already-built parts
    pub fn from_parts(
        model_name: impl Into<String>,
        device: Device,
        encoder: Arc<dyn ClipEncoder>,
        preprocessor: ClipPreprocessor,
        tokenizer: CaptionTokenizer,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            device,
            encoder,
            preprocessor,
            tokenizer,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Sets the upload limit (builder pattern)
    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Device resolved at startup
    pub fn device(&self) -> Device {
        self.device
    }

    pub fn dimension(&self) -> usize {
        self.encoder.dimension()
    }

    pub fn preprocessor(&self) -> &ClipPreprocessor {
        &self.preprocessor
    }

    pub fn tokenizer(&self) -> &CaptionTokenizer {
        &self.tokenizer
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    /// Raw (un-normalized) image embedding
    pub fn encode_image(&self, pixels: Array4<f32>) -> Result<Vec<f32>, EmbeddingError> {
        self.encoder.encode_image(pixels)
    }

    /// Raw (un-normalized) text embedding
    pub fn encode_text(&self, tokens: &TokenBatch) -> Result<Vec<f32>, EmbeddingError> {
        self.encoder.encode_text(tokens)
    }
}

async fn load_encoder(
    files: ModelFiles,
    settings: EncoderSettings,
) -> Result<OnnxClipEncoder, EmbeddingError> {
    tokio::task::spawn_blocking(move || {
        OnnxClipEncoder::load(&files.image_model, &files.text_model, &settings)
    })
    .await
    .map_err(|e| EmbeddingError::ModelLoad(format!("Encoder loading task failed: {}", e)))?
    .map_err(load_error)
}

fn load_error(e: anyhow::Error) -> EmbeddingError {
    EmbeddingError::ModelLoad(format!("{:#}", e))
}
