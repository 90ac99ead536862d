// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversion of the network output back into an encoded image

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use ndarray::ArrayView4;

use super::preprocessing::CHANNELS;

/// Default JPEG quality for stylized output
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Take the first batch element of an NHWC float tensor as an RGB image
///
/// Values are clamped to [0, 1] and scaled to the 8-bit range. The image
/// crate encodes RGB directly, so no channel swap is applied.
pub fn tensor_to_image(output: ArrayView4<f32>) -> Result<RgbImage> {
    let (batch, height, width, channels) = output.dim();

    if batch == 0 {
        anyhow::bail!("Model returned an empty batch");
    }
    if channels != CHANNELS {
        anyhow::bail!(
            "Unexpected output channel count: {}, expected {}",
            channels,
            CHANNELS
        );
    }
    if height == 0 || width == 0 {
        anyhow::bail!("Model returned an empty image ({}x{})", width, height);
    }

    let first = output.index_axis(ndarray::Axis(0), 0);
    let image = RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([
            to_u8(first[[y, x, 0]]),
            to_u8(first[[y, x, 1]]),
            to_u8(first[[y, x, 2]]),
        ])
    });

    Ok(image)
}

fn to_u8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Encode an RGB image as JPEG bytes
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .encode_image(image)
        .context("Failed to encode JPEG")?;
    Ok(buffer)
}
