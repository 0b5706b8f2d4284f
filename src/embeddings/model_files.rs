// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Locating CLIP model files
//!
//! Explicit local paths always win. Anything not given locally is fetched
//! from the Hugging Face Hub into the shared HF cache on first start and
//! reused from there afterwards.

use anyhow::{Context, Result};
use hf_hub::api::tokio::{Api, ApiBuilder};
use std::path::{Path, PathBuf};
use tracing::info;

/// ONNX graph filename inside the hub repositories
pub const ONNX_MODEL_FILE: &str = "model.onnx";

/// Tokenizer filename inside the text repository
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Default hub repository for the ViT-B/32 vision tower
pub const DEFAULT_IMAGE_MODEL_REPO: &str = "Qdrant/clip-ViT-B-32-vision";

/// Default hub repository for the ViT-B/32 text tower and its tokenizer
pub const DEFAULT_TEXT_MODEL_REPO: &str = "Qdrant/clip-ViT-B-32-text";

/// Where model files come from
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub image_model_path: Option<PathBuf>,
    pub text_model_path: Option<PathBuf>,
    pub tokenizer_path: Option<PathBuf>,
    pub image_model_repo: String,
    pub text_model_repo: String,
    /// Overrides the Hugging Face cache directory
    pub cache_dir: Option<PathBuf>,
}

impl Default for ModelSource {
    fn default() -> Self {
        Self {
            image_model_path: None,
            text_model_path: None,
            tokenizer_path: None,
            image_model_repo: DEFAULT_IMAGE_MODEL_REPO.to_string(),
            text_model_repo: DEFAULT_TEXT_MODEL_REPO.to_string(),
            cache_dir: None,
        }
    }
}

/// Local paths of everything the model host loads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub image_model: PathBuf,
    pub text_model: PathBuf,
    pub tokenizer: PathBuf,
}

impl ModelFiles {
    /// Resolves every file to a local path, downloading missing ones
    pub async fn resolve(source: &ModelSource) -> Result<Self> {
        let mut hub = HubFetcher::new(source.cache_dir.clone());

        let image_model = match &source.image_model_path {
            Some(path) => local_file(path, "image model")?,
            None => hub.fetch(&source.image_model_repo, ONNX_MODEL_FILE).await?,
        };
        let text_model = match &source.text_model_path {
            Some(path) => local_file(path, "text model")?,
            None => hub.fetch(&source.text_model_repo, ONNX_MODEL_FILE).await?,
        };
        let tokenizer = match &source.tokenizer_path {
            Some(path) => local_file(path, "tokenizer")?,
            None => hub.fetch(&source.text_model_repo, TOKENIZER_FILE).await?,
        };

        Ok(Self {
            image_model,
            text_model,
            tokenizer,
        })
    }
}

fn local_file(path: &Path, what: &str) -> Result<PathBuf> {
    if !path.is_file() {
        anyhow::bail!("CLIP {} file not found: {}", what, path.display());
    }
    Ok(path.to_path_buf())
}

/// Builds the hub client only when something actually has to be fetched
struct HubFetcher {
    cache_dir: Option<PathBuf>,
    api: Option<Api>,
}

impl HubFetcher {
    fn new(cache_dir: Option<PathBuf>) -> Self {
        Self {
            cache_dir,
            api: None,
        }
    }

    async fn fetch(&mut self, repo: &str, filename: &str) -> Result<PathBuf> {
        if self.api.is_none() {
            let mut builder = ApiBuilder::new().with_progress(false);
            if let Some(dir) = &self.cache_dir {
                builder = builder.with_cache_dir(dir.clone());
            }
            self.api = Some(builder.build().context("Failed to create Hugging Face Hub client")?);
        }
        let api = self
            .api
            .as_ref()
            .context("Hugging Face Hub client unavailable")?;

        info!(repo = %repo, file = %filename, "Fetching CLIP model file");
        let path = api
            .model(repo.to_string())
            .get(filename)
            .await
            .with_context(|| format!("Failed to fetch {} from {}", filename, repo))?;
        info!(path = ?path, "CLIP model file ready");

        Ok(path)
    }
}
