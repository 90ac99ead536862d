// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Style transfer endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::request::{StyleTransferForm, UploadedImage, CONTENT_FIELD, STYLE_FIELD};
use super::response::StyleTransferResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::config::TransferSettings;
use crate::storage::FileStore;
use crate::style::{decode_image_bytes, stylize_images, StyleModel, StylizedImage};

/// POST /style-transfer - Stylize a content image with a style image
///
/// # Request
/// Multipart form with file fields `content_image` and `style_image`.
///
/// # Response
/// - `message`: "Style Transfer Successful!"
/// - `image_url`: `/output/<file>` of the stylized JPEG (unique per request)
/// - `request_id`, `width`, `height`, `processing_time_ms`
///
/// # Errors
/// - 400 Bad Request: a field is missing or an image cannot be decoded
/// - 413 Payload Too Large: an upload exceeds the configured limit
/// - 503 Service Unavailable: style model not loaded
/// - 500 Internal Server Error: inference or disk failure
pub async fn style_transfer_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StyleTransferResponse>, ApiError> {
    let start = Instant::now();

    let multipart = multipart.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let form = StyleTransferForm::from_multipart(multipart, state.settings.max_image_bytes).await?;
    let (content, style) = form.validate()?;

    let model = state.model_manager.get_model().ok_or_else(|| {
        ApiError::ServiceUnavailable("Style model not loaded".to_string())
    })?;

    let request_id = Uuid::new_v4();
    debug!(
        "Style transfer {}: content {} bytes, style {} bytes",
        request_id,
        content.bytes.len(),
        style.bytes.len()
    );

    let uploads = save_uploads(
        &state.store,
        &request_id,
        [&content, &style],
        state.settings.keep_uploads,
    )
    .await?;

    let result = run_transfer(model, content, style, &state.settings).await;

    if !state.settings.keep_uploads {
        state.store.remove_uploads(&uploads).await;
    }

    let stylized = result?;
    let file_name = state.store.write_output(&request_id, &stylized.jpeg).await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    let (width, height) = stylized.image.dimensions();

    info!(
        "Style transfer {} complete: {}x{}, inference {}ms, total {}ms",
        request_id, width, height, stylized.inference_time_ms, processing_time_ms
    );

    Ok(Json(StyleTransferResponse::new(
        &request_id,
        &file_name,
        width,
        height,
        processing_time_ms,
    )))
}

/// Persist both uploads for a request
///
/// If a save fails and uploads are not kept, files already written for this
/// request are removed before the error is returned.
async fn save_uploads(
    store: &FileStore,
    request_id: &Uuid,
    images: [&UploadedImage; 2],
    keep_uploads: bool,
) -> Result<Vec<PathBuf>, ApiError> {
    let mut saved: Vec<PathBuf> = Vec::with_capacity(images.len());
    for image in images {
        match store
            .save_upload(
                request_id,
                &image.field,
                image.file_name.as_deref(),
                &image.bytes,
            )
            .await
        {
            Ok(path) => saved.push(path),
            Err(e) => {
                if !keep_uploads {
                    store.remove_uploads(&saved).await;
                }
                return Err(e.into());
            }
        }
    }
    Ok(saved)
}

/// Decode and stylize on the blocking pool
async fn run_transfer(
    model: Arc<dyn StyleModel>,
    content: UploadedImage,
    style: UploadedImage,
    settings: &TransferSettings,
) -> Result<StylizedImage, ApiError> {
    let max_bytes = settings.max_image_bytes;
    let quality = settings.jpeg_quality;

    tokio::task::spawn_blocking(move || {
        let (content_image, content_info) = decode_image_bytes(&content.bytes, max_bytes)
            .map_err(|e| ApiError::from_image_error(CONTENT_FIELD, e))?;
        let (style_image, style_info) = decode_image_bytes(&style.bytes, max_bytes)
            .map_err(|e| ApiError::from_image_error(STYLE_FIELD, e))?;

        debug!(
            "Decoded content {}x{} {:?}, style {}x{} {:?}",
            content_info.width,
            content_info.height,
            content_info.format,
            style_info.width,
            style_info.height,
            style_info.format
        );

        stylize_images(model.as_ref(), &content_image, &style_image, quality).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Style transfer task failed: {}", e)))?
}
