// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::health::health_handler;
use super::static_files::{asset_handler, index_handler, output_handler};
use super::style_transfer::style_transfer_handler;
use crate::config::TransferSettings;
use crate::storage::FileStore;
use crate::style::StyleModelManager;

#[derive(Clone)]
pub struct AppState {
    pub model_manager: Arc<StyleModelManager>,
    pub store: Arc<FileStore>,
    pub settings: Arc<TransferSettings>,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        model_manager: StyleModelManager,
        store: FileStore,
        settings: TransferSettings,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model_manager: Arc::new(model_manager),
            store: Arc::new(store),
            settings: Arc::new(settings),
            static_dir: Arc::new(static_dir.into()),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.settings.body_limit();

    Router::new()
        // Front end
        .route("/", get(index_handler))
        .route("/:asset", get(asset_handler))
        // Health check
        .route("/health", get(health_handler))
        // Style transfer endpoint
        .route("/style-transfer", post(style_transfer_handler))
        // Stylized results
        .route("/output/:filename", get(output_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("⏹️  Shutting down...");
}
