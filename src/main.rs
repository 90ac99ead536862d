// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::env;
use style_transfer_node::{
    api::{start_server, AppState},
    config::ServiceConfig,
    storage::FileStore,
    style::StyleModelManager,
    version,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::parse();

    tracing::info!("🚀 Starting {}", version::get_version_string());

    let addr = config.listen_addr()?;

    let store = FileStore::new(&config.upload_dir, &config.output_dir).await?;
    tracing::info!(
        "📁 Uploads: {}, outputs: {}",
        store.upload_dir().display(),
        store.output_dir().display()
    );

    tracing::info!("🧠 Loading style transfer model...");
    let model_manager = StyleModelManager::new(config.style_model_config()).await;
    if !model_manager.has_model() {
        tracing::warn!("⚠️  Starting without a style model; /style-transfer will return 503");
    }

    let state = AppState::new(
        model_manager,
        store,
        config.transfer_settings(),
        config.static_dir.clone(),
    );

    tracing::info!("  Front end:  http://{}/", addr);
    tracing::info!("  Transfer:   POST http://{}/style-transfer", addr);
    tracing::info!("  Outputs:    http://{}/output/<filename>", addr);
    tracing::info!("  Health:     http://{}/health", addr);

    start_server(addr, state).await?;

    tracing::info!("👋 Goodbye!");
    Ok(())
}
