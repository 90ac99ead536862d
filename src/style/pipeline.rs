// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end style transfer: preprocess, infer, postprocess

use anyhow::{Context, Result};
use image::{DynamicImage, RgbImage};
use std::time::Instant;
use tracing::debug;

use super::model::StyleModel;
use super::postprocessing::{encode_jpeg, tensor_to_image};
use super::preprocessing::image_to_tensor;

/// Result of one style transfer run
#[derive(Debug, Clone)]
pub struct StylizedImage {
    /// Stylized RGB image (first batch element of the model output)
    pub image: RgbImage,
    /// JPEG encoding of `image`
    pub jpeg: Vec<u8>,
    /// Inference time in milliseconds
    pub inference_time_ms: u64,
}

/// Stylize `content` with `style`
///
/// Both images are resized to the model's input size, so the output
/// dimensions depend only on the model, not on the uploads.
pub fn stylize_images(
    model: &dyn StyleModel,
    content: &DynamicImage,
    style: &DynamicImage,
    jpeg_quality: u8,
) -> Result<StylizedImage> {
    let size = model.input_size();
    let content_tensor =
        image_to_tensor(content, size).context("Failed to preprocess content image")?;
    let style_tensor = image_to_tensor(style, size).context("Failed to preprocess style image")?;

    let start = Instant::now();
    let output = model.stylize(&content_tensor, &style_tensor)?;
    let inference_time_ms = start.elapsed().as_millis() as u64;

    debug!(
        "{} produced {:?} in {}ms",
        model.name(),
        output.shape(),
        inference_time_ms
    );

    let image = tensor_to_image(output.view())?;
    let jpeg = encode_jpeg(&image, jpeg_quality)?;

    Ok(StylizedImage {
        image,
        jpeg,
        inference_time_ms,
    })
}
