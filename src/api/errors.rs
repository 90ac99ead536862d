// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::style::ImageError;

/// JSON error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    MissingField(String),
    InvalidRequest(String),
    InvalidImage {
        field: String,
        message: String,
    },
    PayloadTooLarge {
        limit: usize,
    },
    InvalidFileName(String),
    NotFound(String),
    ServiceUnavailable(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, field) = match self {
            ApiError::MissingField(field) => ("missing_field", Some(field.clone())),
            ApiError::InvalidRequest(_) => ("invalid_request", None),
            ApiError::InvalidImage { field, .. } => ("invalid_image", Some(field.clone())),
            ApiError::PayloadTooLarge { .. } => ("payload_too_large", None),
            ApiError::InvalidFileName(_) => ("invalid_file_name", None),
            ApiError::NotFound(_) => ("not_found", None),
            ApiError::ServiceUnavailable(_) => ("service_unavailable", None),
            ApiError::InternalError(_) => ("internal_error", None),
        };

        ErrorResponse {
            error: self.message(),
            error_type: error_type.to_string(),
            field,
        }
    }

    /// Client-facing message
    pub fn message(&self) -> String {
        match self {
            ApiError::MissingField(_) => "Both content and style images are required!".to_string(),
            ApiError::InvalidRequest(msg) => msg.clone(),
            ApiError::InvalidImage { field, message } => {
                format!("Invalid {}: {}", field, message)
            }
            ApiError::PayloadTooLarge { limit } => {
                format!("Upload exceeds the maximum size of {} bytes", limit)
            }
            ApiError::InvalidFileName(name) => format!("Invalid file name '{}'", name),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::ServiceUnavailable(msg) => msg.clone(),
            ApiError::InternalError(msg) => msg.clone(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_)
            | ApiError::InvalidRequest(_)
            | ApiError::InvalidImage { .. }
            | ApiError::InvalidFileName(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an image decoding failure for the given form field
    pub fn from_image_error(field: &str, err: ImageError) -> Self {
        match err {
            ImageError::TooLarge(_, limit) => ApiError::PayloadTooLarge { limit },
            ImageError::EmptyData => ApiError::MissingField(field.to_string()),
            other => ApiError::InvalidImage {
                field: field.to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(format!("{:#}", err))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingField(field) => write!(f, "Missing form field: {}", field),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::InvalidImage { field, message } => {
                write!(f, "Invalid image in {}: {}", field, message)
            }
            ApiError::PayloadTooLarge { limit } => {
                write!(f, "Payload too large (limit {} bytes)", limit)
            }
            ApiError::InvalidFileName(name) => write!(f, "Invalid file name: {}", name),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
        (self.status_code(), axum::Json(self.to_response())).into_response()
    }
}
