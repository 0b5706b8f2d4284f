// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{caption_handler, health_handler, image_handler, root_handler, ApiError};
use crate::embeddings::ModelHost;

/// Room for multipart boundaries and part headers on top of the image limit
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub model_host: Arc<ModelHost>,
}

impl AppState {
    pub fn new(model_host: Arc<ModelHost>) -> Self {
        Self { model_host }
    }
}

/// Builds the router with all endpoints and middleware
pub fn create_app(state: AppState) -> Router {
    let body_limit = state
        .model_host
        .max_image_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        // Liveness
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // Embedding endpoints
        .route("/embed/image", post(image_handler))
        .route("/embed/caption", post(caption_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router until Ctrl+C
pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound("No such endpoint".to_string())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
