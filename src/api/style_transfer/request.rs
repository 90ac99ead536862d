// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form parsing and validation for style transfer

use axum::http::StatusCode;
use axum_extra::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;
use tracing::debug;

use crate::api::errors::ApiError;

/// Form field carrying the content image
pub const CONTENT_FIELD: &str = "content_image";

/// Form field carrying the style image
pub const STYLE_FIELD: &str = "style_image";

/// One uploaded image file
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Form field name
    pub field: String,
    /// Client-supplied filename (untrusted)
    pub file_name: Option<String>,
    /// Raw file contents
    pub bytes: Bytes,
}

/// The two images of a style transfer submission
#[derive(Debug, Clone, Default)]
pub struct StyleTransferForm {
    pub content_image: Option<UploadedImage>,
    pub style_image: Option<UploadedImage>,
}

impl StyleTransferForm {
    /// Read the form, keeping only the two known image fields
    ///
    /// Fields over `max_image_bytes` are rejected as they are read.
    pub async fn from_multipart(
        mut multipart: Multipart,
        max_image_bytes: usize,
    ) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, max_image_bytes))?
        {
            let name = match field.name() {
                Some(name @ (CONTENT_FIELD | STYLE_FIELD)) => name.to_string(),
                other => {
                    debug!("Ignoring form field {:?}", other);
                    continue;
                }
            };
            let file_name = field.file_name().map(str::to_string);

            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, max_image_bytes))?;

            if bytes.len() > max_image_bytes {
                return Err(ApiError::PayloadTooLarge {
                    limit: max_image_bytes,
                });
            }

            form.insert(UploadedImage {
                field: name,
                file_name,
                bytes,
            });
        }

        Ok(form)
    }

    /// Place an upload into its slot; later duplicates replace earlier ones
    pub fn insert(&mut self, image: UploadedImage) {
        match image.field.as_str() {
            CONTENT_FIELD => self.content_image = Some(image),
            STYLE_FIELD => self.style_image = Some(image),
            _ => {}
        }
    }

    /// Require both images; an empty file counts as missing
    pub fn validate(self) -> Result<(UploadedImage, UploadedImage), ApiError> {
        let content = self
            .content_image
            .filter(|img| !img.bytes.is_empty())
            .ok_or_else(|| ApiError::MissingField(CONTENT_FIELD.to_string()))?;
        let style = self
            .style_image
            .filter(|img| !img.bytes.is_empty())
            .ok_or_else(|| ApiError::MissingField(STYLE_FIELD.to_string()))?;
        Ok((content, style))
    }
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::InvalidRequest(format!("Malformed multipart body: {}", err.body_text()))
    }
}
