// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::AppState;
use crate::version;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Message returned by GET /
pub const SERVICE_MESSAGE: &str = "This is Embedding Service";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RootResponse {
    pub msg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub device: String,
    pub dimension: usize,
    pub version: String,
    pub features: Vec<String>,
}

/// GET / liveness probe
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        msg: SERVICE_MESSAGE.to_string(),
    })
}

/// GET /health
///
/// The host only exists once both encoders loaded, so a served request is
/// always "healthy".
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let host = &state.model_host;
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: host.model_name().to_string(),
        device: host.device().to_string(),
        dimension: host.dimension(),
        version: version::VERSION_NUMBER.to_string(),
        features: version::features(),
    })
}
