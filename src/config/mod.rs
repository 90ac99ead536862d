// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration from CLI flags and environment variables

use clap::{ArgAction, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::style::model_manager::{DEFAULT_MODEL_FILE, DEFAULT_MODEL_PATH};
use crate::style::postprocessing::DEFAULT_JPEG_QUALITY;
use crate::style::{OnnxSessionOptions, StyleModelConfig};

/// Style Transfer Node
#[derive(Parser, Debug, Clone)]
#[command(name = "style-transfer-node")]
#[command(version)]
#[command(about = "HTTP service for arbitrary image style transfer", long_about = None)]
pub struct ServiceConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Directory for uploaded content and style images
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Directory for stylized outputs served under /output
    #[arg(long, env = "OUTPUT_DIR", default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Directory holding index.html and other front-end assets
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Local ONNX style model
    #[arg(long, env = "STYLE_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Model hub repository used when the local model is missing
    #[arg(long, env = "STYLE_MODEL_REPO")]
    pub model_repo: Option<String>,

    /// File to fetch from the model hub repository
    #[arg(long, env = "STYLE_MODEL_FILE", default_value = DEFAULT_MODEL_FILE)]
    pub model_file: String,

    /// Model hub cache directory
    #[arg(long, env = "MODEL_CACHE_DIR")]
    pub model_cache_dir: Option<PathBuf>,

    /// Content input name of the model (first input when unset)
    #[arg(long, env = "STYLE_MODEL_CONTENT_INPUT")]
    pub content_input: Option<String>,

    /// Style input name of the model (second input when unset)
    #[arg(long, env = "STYLE_MODEL_STYLE_INPUT")]
    pub style_input: Option<String>,

    /// Run inference on CPU only
    #[arg(long, env = "FORCE_CPU")]
    pub force_cpu: bool,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Per-image upload limit in megabytes
    #[arg(long, env = "MAX_UPLOAD_MB", default_value_t = 10)]
    pub max_upload_mb: usize,

    /// JPEG quality of stylized output (1-100)
    #[arg(long, env = "JPEG_QUALITY", default_value_t = DEFAULT_JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    /// Keep uploaded files after processing
    #[arg(long, env = "KEEP_UPLOADS", default_value_t = true, action = ArgAction::Set)]
    pub keep_uploads: bool,
}

/// Per-request processing settings
#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub max_image_bytes: usize,
    pub jpeg_quality: u8,
    pub keep_uploads: bool,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            max_image_bytes: crate::style::image_utils::DEFAULT_MAX_IMAGE_BYTES,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            keep_uploads: true,
        }
    }
}

impl TransferSettings {
    /// Request body limit: two images plus multipart framing
    pub fn body_limit(&self) -> usize {
        self.max_image_bytes * 2 + 64 * 1024
    }
}

impl ServiceConfig {
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {}:{}: {}", self.host, self.port, e))
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            max_image_bytes: self.max_image_bytes(),
            jpeg_quality: self.jpeg_quality,
            keep_uploads: self.keep_uploads,
        }
    }

    pub fn style_model_config(&self) -> StyleModelConfig {
        StyleModelConfig {
            model_path: Some(self.model_path.clone()),
            model_repo: self.model_repo.clone(),
            model_file: self.model_file.clone(),
            cache_dir: self.model_cache_dir.clone(),
            session: OnnxSessionOptions {
                force_cpu: self.force_cpu,
                intra_threads: self.intra_threads,
                content_input: self.content_input.clone(),
                style_input: self.style_input.clone(),
            },
        }
    }
}
