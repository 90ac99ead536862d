// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Style model manager: resolves the model artifact and owns the loaded model

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use super::model::{OnnxSessionOptions, OnnxStyleModel, StyleModel};

/// Default model file inside a hub repository
pub const DEFAULT_MODEL_FILE: &str = "model.onnx";

/// Default local model location
pub const DEFAULT_MODEL_PATH: &str = "./models/arbitrary-image-stylization-v1-256/model.onnx";

/// Configuration for loading the style transfer model
#[derive(Debug, Clone)]
pub struct StyleModelConfig {
    /// Local ONNX file, used when it exists
    pub model_path: Option<PathBuf>,
    /// Model hub repository id to download from when no local file exists
    pub model_repo: Option<String>,
    /// File to fetch from the hub repository
    pub model_file: String,
    /// Hub cache directory (hub default when unset)
    pub cache_dir: Option<PathBuf>,
    /// ONNX Runtime session options
    pub session: OnnxSessionOptions,
}

impl Default for StyleModelConfig {
    fn default() -> Self {
        Self {
            model_path: Some(PathBuf::from(DEFAULT_MODEL_PATH)),
            model_repo: None,
            model_file: DEFAULT_MODEL_FILE.to_string(),
            cache_dir: None,
            session: OnnxSessionOptions::default(),
        }
    }
}

impl StyleModelConfig {
    /// Name reported for the loaded model
    pub fn display_name(&self) -> String {
        if let Some(ref repo) = self.model_repo {
            return repo.clone();
        }
        self.model_path
            .as_ref()
            .and_then(|p| p.parent())
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "style-transfer".to_string())
    }
}

/// Where the model file came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Local(PathBuf),
    Hub { repo: String, path: PathBuf },
}

impl ModelSource {
    pub fn path(&self) -> &PathBuf {
        match self {
            ModelSource::Local(path) => path,
            ModelSource::Hub { path, .. } => path,
        }
    }
}

/// Resolve the model file: existing local path first, then the model hub
pub async fn resolve_model_source(config: &StyleModelConfig) -> Result<ModelSource> {
    if let Some(ref path) = config.model_path {
        if path.exists() {
            return Ok(ModelSource::Local(path.clone()));
        }
        tracing::debug!("Local style model not found at {}", path.display());
    }

    let repo = config.model_repo.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "No style model available: local path {} missing and no hub repository configured",
            config
                .model_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unset>".to_string())
        )
    })?;

    tracing::info!("📥 Fetching {} from model hub repo {}", config.model_file, repo);

    let mut builder = hf_hub::api::tokio::ApiBuilder::new();
    if let Some(ref dir) = config.cache_dir {
        builder = builder.with_cache_dir(dir.clone());
    }
    let api = builder
        .build()
        .context("Failed to initialise model hub client")?;

    let path = api
        .model(repo.clone())
        .get(&config.model_file)
        .await
        .with_context(|| format!("Failed to fetch {} from {}", config.model_file, repo))?;

    Ok(ModelSource::Hub {
        repo: repo.clone(),
        path,
    })
}

async fn load_style_model(config: &StyleModelConfig, name: &str) -> Result<OnnxStyleModel> {
    let source = resolve_model_source(config).await?;
    OnnxStyleModel::new(name, source.path(), &config.session).await
}

/// Owns the style model for the lifetime of the service
///
/// A failed load is not fatal: the service stays up in a degraded state so
/// the front end and previous outputs remain reachable.
#[derive(Clone)]
pub struct StyleModelManager {
    model: Option<Arc<dyn StyleModel>>,
    load_error: Option<String>,
}

impl std::fmt::Debug for StyleModelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleModelManager")
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .field("load_error", &self.load_error)
            .finish()
    }
}

impl StyleModelManager {
    /// Resolve and load the model described by `config`
    pub async fn new(config: StyleModelConfig) -> Self {
        let name = config.display_name();

        match load_style_model(&config, &name).await {
            Ok(model) => {
                tracing::info!("✅ Style model {} ready", name);
                Self::with_model(Arc::new(model))
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to load style model {}: {:#}", name, e);
                Self {
                    model: None,
                    load_error: Some(format!("{:#}", e)),
                }
            }
        }
    }

    /// Wrap an already constructed model
    pub fn with_model(model: Arc<dyn StyleModel>) -> Self {
        Self {
            model: Some(model),
            load_error: None,
        }
    }

    /// Manager with no model loaded
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            model: None,
            load_error: Some(reason.into()),
        }
    }

    pub fn get_model(&self) -> Option<Arc<dyn StyleModel>> {
        self.model.clone()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<String> {
        self.model.as_ref().map(|m| m.name().to_string())
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }
}
