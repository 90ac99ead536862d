// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Style transfer API endpoint module
//!
//! Provides POST /style-transfer for stylizing uploaded images.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::style_transfer_handler;
pub use request::{StyleTransferForm, UploadedImage, CONTENT_FIELD, STYLE_FIELD};
pub use response::StyleTransferResponse;
