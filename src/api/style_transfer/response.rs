// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Style transfer response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message returned on success
pub const SUCCESS_MESSAGE: &str = "Style Transfer Successful!";

/// URL prefix under which outputs are served
pub const OUTPUT_URL_PREFIX: &str = "/output/";

/// Response from a successful style transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleTransferResponse {
    pub message: String,
    /// Path of the stylized JPEG, e.g. `/output/stylized_<id>.jpg`
    pub image_url: String,
    pub request_id: String,
    pub width: u32,
    pub height: u32,
    pub processing_time_ms: u64,
}

impl StyleTransferResponse {
    pub fn new(
        request_id: &Uuid,
        file_name: &str,
        width: u32,
        height: u32,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            image_url: format!("{}{}", OUTPUT_URL_PREFIX, file_name),
            request_id: request_id.to_string(),
            width,
            height,
            processing_time_ms,
        }
    }
}
