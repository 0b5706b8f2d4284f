// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod pipeline;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{create_app, AppState};
pub use config::ServiceConfig;
pub use embeddings::{
    ClipEncoder, Device, DeviceStrategy, EmbeddingError, EmbeddingResult, ModelHost,
    ModelHostConfig,
};
pub use pipeline::{embed_image, embed_text};
