// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use clip_embed_node::{
    api::{start_server, AppState},
    config::ServiceConfig,
    embeddings::ModelHost,
    version,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env values feed the clap env fallbacks below
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🚀 Starting CLIP Embedding Node...\n");
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("📅 Build Date: {}", version::BUILD_DATE);
    println!("✨ Features: {}", version::FEATURES.join(", "));
    println!();

    tracing::info!("{}", version::get_version_string());

    let config = ServiceConfig::parse();
    config.validate().context("Invalid configuration")?;

    println!("🧠 Loading CLIP model {}...", config.model_name);
    println!("   Device strategy: {:?}", config.device);
    let model_host = ModelHost::load(config.model_host_config())
        .await
        .context("Failed to load CLIP model")?;
    println!(
        "✅ Model ready on {} ({} dimensions)",
        model_host.device(),
        model_host.dimension()
    );

    println!("🌐 Starting API server on {}...", config.listen_addr);
    let state = AppState::new(Arc::new(model_host));
    start_server(config.listen_addr, state).await?;

    println!("👋 {} stopped", version::get_version_string());
    Ok(())
}
