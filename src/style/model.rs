// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Arbitrary style transfer model backed by ONNX Runtime
//!
//! The network is treated as an opaque function of (content, style) that
//! returns a batch of stylized images. Both inputs and the output use the
//! NHWC layout with float values in [0, 1].

use anyhow::{Context, Result};
use ndarray::{Array4, Ix4};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use super::preprocessing::{CHANNELS, STYLE_INPUT_SIZE};

/// A style transfer backend
///
/// Implementations must be callable from the blocking thread pool.
pub trait StyleModel: Send + Sync {
    /// Model name reported by the API
    fn name(&self) -> &str;

    /// Spatial size both inputs are resized to
    fn input_size(&self) -> u32 {
        STYLE_INPUT_SIZE
    }

    /// Stylize `content` with `style`; both are [1, H, W, 3]
    fn stylize(&self, content: &Array4<f32>, style: &Array4<f32>) -> Result<Array4<f32>>;
}

/// Options for building an ONNX style transfer session
#[derive(Debug, Clone)]
pub struct OnnxSessionOptions {
    /// Skip accelerator providers entirely
    pub force_cpu: bool,
    /// Intra-op thread count
    pub intra_threads: usize,
    /// Explicit content input name (defaults to the first model input)
    pub content_input: Option<String>,
    /// Explicit style input name (defaults to the second model input)
    pub style_input: Option<String>,
}

impl Default for OnnxSessionOptions {
    fn default() -> Self {
        Self {
            force_cpu: false,
            intra_threads: 4,
            content_input: None,
            style_input: None,
        }
    }
}

/// ONNX arbitrary-image-stylization network
#[derive(Clone)]
pub struct OnnxStyleModel {
    /// ONNX Runtime session (one evaluation at a time)
    session: Arc<Mutex<Session>>,
    content_input: String,
    style_input: String,
    model_name: String,
}

impl std::fmt::Debug for OnnxStyleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxStyleModel")
            .field("model_name", &self.model_name)
            .field("content_input", &self.content_input)
            .field("style_input", &self.style_input)
            .finish_non_exhaustive()
    }
}

impl OnnxStyleModel {
    /// Load the network from an ONNX file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    /// - The model does not declare two inputs (content and style)
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        options: &OnnxSessionOptions,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Style model file not found: {}", model_path.display());
        }

        info!("Loading style transfer model from {}", model_path.display());

        let session = {
            let model_path = model_path.to_path_buf();
            let options = options.clone();
            tokio::task::spawn_blocking(move || build_session(&model_path, &options))
                .await
                .context("Style model loading task failed")??
        };

        let input_names: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        debug!("Style model inputs: {:?}", input_names);

        let (content_input, style_input) = select_input_names(
            &input_names,
            options.content_input.as_deref(),
            options.style_input.as_deref(),
        )?;

        info!(
            "✅ Style transfer model loaded - content: {}, style: {}",
            content_input, style_input
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            content_input,
            style_input,
            model_name,
        })
    }
}

/// Build the session, preferring CUDA unless CPU is forced
///
/// Runs on the blocking pool; provider setup and graph optimization can take
/// seconds.
fn build_session(model_path: &Path, options: &OnnxSessionOptions) -> Result<Session> {
    if options.force_cpu {
        info!("   CPU-only execution requested");
        return build_cpu_session(model_path, options.intra_threads);
    }

    let cuda_result = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .context("Failed to set CUDA execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(options.intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path);

    match cuda_result {
        Ok(s) => {
            info!("✅ CUDA execution provider initialized");
            Ok(s)
        }
        Err(e) => {
            warn!("⚠️  CUDA execution provider failed: {}", e);
            warn!("   Falling back to CPU execution provider");
            build_cpu_session(model_path, options.intra_threads)
        }
    }
}

fn build_cpu_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .context(format!(
            "Failed to load style model from {}",
            model_path.display()
        ))
}

/// Pick the (content, style) input names
///
/// Explicit names must exist in the model. Without them, the first two
/// declared inputs are used in order.
pub fn select_input_names(
    available: &[String],
    content: Option<&str>,
    style: Option<&str>,
) -> Result<(String, String)> {
    if available.len() < 2 {
        anyhow::bail!(
            "Style model must take two inputs (content, style), found {:?}",
            available
        );
    }

    let pick = |requested: Option<&str>, fallback: &String| -> Result<String> {
        match requested {
            Some(name) if available.iter().any(|a| a == name) => Ok(name.to_string()),
            Some(name) => anyhow::bail!(
                "Input '{}' not found in style model, available: {:?}",
                name,
                available
            ),
            None => Ok(fallback.clone()),
        }
    };

    let content_input = pick(content, &available[0])?;
    let style_input = pick(style, &available[1])?;

    if content_input == style_input {
        anyhow::bail!("Content and style inputs must differ, both are '{}'", content_input);
    }

    Ok((content_input, style_input))
}

fn validate_input(name: &str, tensor: &Array4<f32>) -> Result<()> {
    let shape = tensor.shape();
    if shape[0] != 1 || shape[3] != CHANNELS {
        anyhow::bail!(
            "Invalid {} tensor shape: {:?}, expected [1, H, W, 3]",
            name,
            shape
        );
    }
    Ok(())
}

impl StyleModel for OnnxStyleModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn stylize(&self, content: &Array4<f32>, style: &Array4<f32>) -> Result<Array4<f32>> {
        validate_input("content", content)?;
        validate_input("style", style)?;

        let content_value =
            Value::from_array(content.to_owned()).context("Failed to create content tensor")?;
        let style_value =
            Value::from_array(style.to_owned()).context("Failed to create style tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Style model session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![
                self.content_input.as_str() => content_value,
                self.style_input.as_str() => style_value
            ])
            .context("Style transfer inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        debug!("Style model output shape: {:?}", output_tensor.shape());

        let stylized = output_tensor
            .to_owned()
            .into_dimensionality::<Ix4>()
            .context("Style model output is not a rank-4 tensor")?;

        Ok(stylized)
    }
}
