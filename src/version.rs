// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the CLIP Embedding Node

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-clip-embeddings-2025-11-03";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Build date
pub const BUILD_DATE: &str = "2025-11-03";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "clip-vit-b32",
    "image-embeddings",
    "caption-embeddings",
    "l2-normalized",
    "onnx-runtime",
    "cuda-auto-detect",
    "hf-hub-models",
    "multipart-upload",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("CLIP Embedding Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Feature list as owned strings for API responses
pub fn features() -> Vec<String> {
    FEATURES.iter().map(|f| f.to_string()).collect()
}
