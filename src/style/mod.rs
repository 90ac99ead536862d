// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Arbitrary image style transfer
//!
//! This module provides:
//! - Upload decoding with magic-byte format detection
//! - Preprocessing into [1, 256, 256, 3] float tensors
//! - The ONNX style network behind the `StyleModel` trait
//! - Postprocessing of the network output into a JPEG

pub mod image_utils;
pub mod model;
pub mod model_manager;
pub mod pipeline;
pub mod postprocessing;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
pub use model::{OnnxSessionOptions, OnnxStyleModel, StyleModel};
pub use model_manager::{ModelSource, StyleModelConfig, StyleModelManager};
pub use pipeline::{stylize_images, StylizedImage};
pub use preprocessing::STYLE_INPUT_SIZE;
