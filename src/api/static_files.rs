// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Front-end and output file routes
//!
//! Files are served whole, with a content type from the extension and no
//! caching, ETag, or range handling.

use axum::{
    extract::{Path as UrlPath, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::path::Path;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::storage::resolve_in;

/// Front-end entry file
pub const INDEX_FILE: &str = "index.html";

/// GET / - Serve the front-end entry file
pub async fn index_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    serve_file(&state.static_dir, INDEX_FILE).await
}

/// GET /{asset} - Serve another file from the front-end directory
pub async fn asset_handler(
    State(state): State<AppState>,
    UrlPath(asset): UrlPath<String>,
) -> Result<Response, ApiError> {
    serve_file(&state.static_dir, &asset).await
}

/// GET /output/{filename} - Serve a stylized result
pub async fn output_handler(
    State(state): State<AppState>,
    UrlPath(file_name): UrlPath<String>,
) -> Result<Response, ApiError> {
    serve_file(state.store.output_dir(), &file_name).await
}

/// Read `name` from `dir` and return it with a guessed content type
pub async fn serve_file(dir: &Path, name: &str) -> Result<Response, ApiError> {
    let path = resolve_in(dir, name).ok_or_else(|| ApiError::InvalidFileName(name.to_string()))?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!("File '{}' not found", name)));
        }
        Err(e) => {
            return Err(ApiError::InternalError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    debug!("Serving {} ({} bytes)", path.display(), bytes.len());

    Ok(([(header::CONTENT_TYPE, content_type_for(name))], bytes).into_response())
}

/// Content type by file extension
pub fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
