// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX CLIP encoder pair
//!
//! This module wraps two ONNX Runtime sessions, the CLIP vision tower and
//! the CLIP text tower, exported with their projection heads so both emit
//! vectors in the joint embedding space.
//!
//! Features:
//! - ONNX model loading from disk onto a resolved [`Device`]
//! - Input/output discovery from the session metadata
//! - Dimension validation by a dummy forward pass at load time
//! - One mutex per session, so image and text requests do not block each other

use crate::embeddings::{ClipEncoder, Device, EmbeddingError, TokenBatch};
use anyhow::{Context, Result};
use ndarray::{Array2, Array4, ArrayViewD, Axis};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::{Session, SessionInputValue};
use ort::value::Tensor;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Output the vision export names its projected embedding
const IMAGE_EMBEDS_OUTPUT: &str = "image_embeds";

/// Output the text export names its projected embedding
const TEXT_EMBEDS_OUTPUT: &str = "text_embeds";

/// Load-time settings for [`OnnxClipEncoder`]
#[derive(Debug, Clone)]
pub struct EncoderSettings {
    /// Device both sessions are pinned to
    pub device: Device,
    /// ONNX Runtime intra-op threads per session
    pub intra_threads: usize,
    /// Expected embedding dimension (512 for ViT-B/32)
    pub dimension: usize,
    /// Side length of the square image input (224 for ViT-B/32)
    pub image_size: usize,
    /// Token sequence length (77 for CLIP)
    pub context_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextInput {
    InputIds,
    AttentionMask,
}

/// CLIP vision + text encoders on ONNX Runtime
///
/// # Thread Safety
/// Each session is wrapped in its own `Mutex` because `Session::run`
/// needs exclusive access. Calls to the same tower are serialized.
pub struct OnnxClipEncoder {
    vision: Mutex<Session>,
    text: Mutex<Session>,
    vision_input: String,
    vision_output: usize,
    text_inputs: Vec<(String, TextInput)>,
    text_output: usize,
    dimension: usize,
    device: Device,
}

impl std::fmt::Debug for OnnxClipEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClipEncoder")
            .field("vision_input", &self.vision_input)
            .field("text_inputs", &self.text_inputs)
            .field("dimension", &self.dimension)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl OnnxClipEncoder {
    /// Loads both encoder sessions and validates their output dimension
    ///
    /// # Errors
    /// Returns error if:
    /// - A model file is missing or not a valid ONNX graph
    /// - The device's execution provider cannot be registered
    /// - The text model expects inputs other than ids / attention mask
    /// - Either tower emits a vector of the wrong dimension
    pub fn load<P: AsRef<Path>>(
        vision_model_path: P,
        text_model_path: P,
        settings: &EncoderSettings,
    ) -> Result<Self> {
        let vision_model_path = vision_model_path.as_ref();
        let text_model_path = text_model_path.as_ref();

        info!(
            device = %settings.device,
            "Initializing CLIP vision encoder from {}",
            vision_model_path.display()
        );
        let vision = build_session(vision_model_path, settings)?;

        info!(
            device = %settings.device,
            "Initializing CLIP text encoder from {}",
            text_model_path.display()
        );
        let text = build_session(text_model_path, settings)?;

        let vision_input = vision
            .inputs
            .first()
            .map(|i| i.name.clone())
            .context("Vision model declares no inputs")?;
        let vision_output = output_index(&vision, IMAGE_EMBEDS_OUTPUT)?;

        let text_inputs = text
            .inputs
            .iter()
            .map(|i| classify_text_input(&i.name).map(|kind| (i.name.clone(), kind)))
            .collect::<Result<Vec<_>>>()?;
        if !text_inputs.iter().any(|(_, kind)| *kind == TextInput::InputIds) {
            anyhow::bail!("Text model has no input_ids input");
        }
        let text_output = output_index(&text, TEXT_EMBEDS_OUTPUT)?;

        let encoder = Self {
            vision: Mutex::new(vision),
            text: Mutex::new(text),
            vision_input,
            vision_output,
            text_inputs,
            text_output,
            dimension: settings.dimension,
            device: settings.device,
        };

        encoder.validate(settings)?;

        info!(
            "✅ CLIP encoders loaded ({} dimensions on {})",
            encoder.dimension, encoder.device
        );

        Ok(encoder)
    }

    /// Runs one dummy forward pass per tower and checks the output size
    fn validate(&self, settings: &EncoderSettings) -> Result<()> {
        let size = settings.image_size;
        let pixels = Array4::<f32>::zeros((1, 3, size, size));
        let image_embedding = self
            .encode_image(pixels)
            .context("Vision encoder validation failed")?;
        if image_embedding.len() != settings.dimension {
            anyhow::bail!(
                "Vision encoder outputs {} dimensions (expected {})",
                image_embedding.len(),
                settings.dimension
            );
        }

        let length = settings.context_length;
        let tokens = TokenBatch {
            input_ids: Array2::zeros((1, length)),
            attention_mask: Array2::ones((1, length)),
        };
        let text_embedding = self
            .encode_text(&tokens)
            .context("Text encoder validation failed")?;
        if text_embedding.len() != settings.dimension {
            anyhow::bail!(
                "Text encoder outputs {} dimensions (expected {})",
                text_embedding.len(),
                settings.dimension
            );
        }

        Ok(())
    }
}

impl ClipEncoder for OnnxClipEncoder {
    fn encode_image(&self, pixels: Array4<f32>) -> Result<Vec<f32>, EmbeddingError> {
        let input = Tensor::from_array(pixels).map_err(EmbeddingError::inference)?;

        let mut session = self
            .vision
            .lock()
            .map_err(|_| EmbeddingError::Inference("Vision session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![self.vision_input.as_str() => input])
            .map_err(EmbeddingError::inference)?;

        let output = outputs[self.vision_output]
            .try_extract_array::<f32>()
            .map_err(EmbeddingError::inference)?;

        let embedding = first_embedding(output)?;
        debug!(dims = embedding.len(), "Vision encoder forward pass complete");
        Ok(embedding)
    }

    fn encode_text(&self, tokens: &TokenBatch) -> Result<Vec<f32>, EmbeddingError> {
        let mut inputs: Vec<(Cow<'_, str>, SessionInputValue<'_>)> =
            Vec::with_capacity(self.text_inputs.len());
        for (name, kind) in &self.text_inputs {
            let array = match kind {
                TextInput::InputIds => tokens.input_ids.clone(),
                TextInput::AttentionMask => tokens.attention_mask.clone(),
            };
            let tensor = Tensor::from_array(array).map_err(EmbeddingError::inference)?;
            inputs.push((Cow::from(name.as_str()), tensor.into()));
        }

        let mut session = self
            .text
            .lock()
            .map_err(|_| EmbeddingError::Inference("Text session lock poisoned".to_string()))?;

        let outputs = session.run(inputs).map_err(EmbeddingError::inference)?;

        let output = outputs[self.text_output]
            .try_extract_array::<f32>()
            .map_err(EmbeddingError::inference)?;

        let embedding = first_embedding(output)?;
        debug!(dims = embedding.len(), "Text encoder forward pass complete");
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn build_session(model_path: &Path, settings: &EncoderSettings) -> Result<Session> {
    if !model_path.exists() {
        anyhow::bail!("ONNX model file not found: {}", model_path.display());
    }

    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers(settings.device.execution_providers())
        .context(format!("Failed to set {} execution provider", settings.device))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(settings.intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .context(format!(
            "Failed to load ONNX model from {}",
            model_path.display()
        ))
}

/// Index of the named output, or of the first output when the export
/// uses another name
fn output_index(session: &Session, preferred: &str) -> Result<usize> {
    if session.outputs.is_empty() {
        anyhow::bail!("Model declares no outputs");
    }
    Ok(session
        .outputs
        .iter()
        .position(|o| o.name == preferred)
        .unwrap_or(0))
}

fn classify_text_input(name: &str) -> Result<TextInput> {
    if name == "input_ids" || name.ends_with("input_ids") {
        Ok(TextInput::InputIds)
    } else if name.contains("attention_mask") {
        Ok(TextInput::AttentionMask)
    } else {
        anyhow::bail!("Unsupported text model input: {}", name)
    }
}

/// The first batch row of an encoder output (`[dim]` or `[batch, dim]`)
fn first_embedding(output: ArrayViewD<'_, f32>) -> Result<Vec<f32>, EmbeddingError> {
    match output.ndim() {
        1 => Ok(output.iter().copied().collect()),
        2 if output.shape()[0] > 0 => Ok(output.index_axis(Axis(0), 0).iter().copied().collect()),
        _ => Err(EmbeddingError::Inference(format!(
            "Unexpected encoder output shape {:?}",
            output.shape()
        ))),
    }
}
