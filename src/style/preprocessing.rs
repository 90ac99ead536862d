// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the arbitrary style transfer network

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

/// Spatial size both inputs are resized to before inference
pub const STYLE_INPUT_SIZE: u32 = 256;

/// Channels per pixel (RGB)
pub const CHANNELS: usize = 3;

/// Convert an image into a batched NHWC tensor
///
/// Steps:
/// 1. Resize to `size` x `size` in the source pixel type (bilinear, aspect
///    ratio not preserved)
/// 2. Convert to 3-channel RGB f32 in [0, 1]
/// 3. Add a batch dimension: [1, size, size, 3]
///
/// Float conversion happens after the resize so the f32 buffer is always
/// `size * size * 3`, whatever the upload resolution.
pub fn image_to_tensor(image: &DynamicImage, size: u32) -> Result<Array4<f32>> {
    let resized = image
        .resize_exact(size, size, FilterType::Triangle)
        .into_rgb32f();

    let side = size as usize;
    Array4::from_shape_vec((1, side, side, CHANNELS), resized.into_raw())
        .context("Failed to build input tensor")
}
