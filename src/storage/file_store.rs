// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload and output directories
//!
//! Uploads are stored under sanitized names prefixed with the request id,
//! and every request gets its own output file, so concurrent requests never
//! write to the same path. Outputs are written to a temporary file and
//! renamed into place so readers never observe a partial JPEG.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Longest sanitized filename kept from a client upload
const MAX_FILE_NAME_LEN: usize = 100;

/// Output file naming prefix
pub const OUTPUT_PREFIX: &str = "stylized_";

/// Local directories backing the service
#[derive(Debug, Clone)]
pub struct FileStore {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl FileStore {
    /// Create the store, creating both directories if absent
    pub async fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let upload_dir = upload_dir.into();
        let output_dir = output_dir.into();

        tokio::fs::create_dir_all(&upload_dir)
            .await
            .with_context(|| format!("Failed to create upload dir {}", upload_dir.display()))?;
        tokio::fs::create_dir_all(&output_dir)
            .await
            .with_context(|| format!("Failed to create output dir {}", output_dir.display()))?;

        Ok(Self {
            upload_dir,
            output_dir,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Persist an uploaded file and return its path
    pub async fn save_upload(
        &self,
        request_id: &Uuid,
        field: &str,
        client_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<PathBuf> {
        let name = sanitize_file_name(client_name.unwrap_or_default(), field);
        let path = self.upload_dir.join(format!("{}_{}", request_id.simple(), name));

        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to save upload {}", path.display()))?;

        debug!("Saved {} ({} bytes) to {}", field, bytes.len(), path.display());
        Ok(path)
    }

    /// Write the stylized JPEG for a request, returning its file name
    pub async fn write_output(&self, request_id: &Uuid, jpeg: &[u8]) -> Result<String> {
        let file_name = output_file_name(request_id);
        let final_path = self.output_dir.join(&file_name);
        let temp_path = self.output_dir.join(format!(".{}.part", file_name));

        let written = match tokio::fs::write(&temp_path, jpeg).await {
            Ok(()) => tokio::fs::rename(&temp_path, &final_path)
                .await
                .with_context(|| format!("Failed to move output into {}", final_path.display())),
            Err(e) => Err(e).with_context(|| format!("Failed to write {}", temp_path.display())),
        };

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove {}: {}", temp_path.display(), cleanup);
                }
            }
            return Err(e);
        }

        Ok(file_name)
    }

    /// Best-effort removal of upload files
    pub async fn remove_uploads(&self, paths: &[PathBuf]) {
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("Failed to remove upload {}: {}", path.display(), e);
            }
        }
    }
}

/// Output file name for a request
pub fn output_file_name(request_id: &Uuid) -> String {
    format!("{}{}.jpg", OUTPUT_PREFIX, request_id.simple())
}

/// Reduce a client-supplied filename to a safe single path component
///
/// Directory parts are discarded, only `[A-Za-z0-9._-]` survive, leading
/// dots are stripped and the result is length-limited. Falls back to
/// `fallback` when nothing usable remains.
pub fn sanitize_file_name(name: &str, fallback: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .take(MAX_FILE_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

/// True if `name` is a plain file name with no path semantics
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.starts_with('.')
}

/// Join `name` onto `dir` when it is a safe single component
pub fn resolve_in(dir: &Path, name: &str) -> Option<PathBuf> {
    if is_safe_file_name(name) {
        Some(dir.join(name))
    } else {
        None
    }
}
