// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod health;
pub mod http_server;
pub mod static_files;
pub mod style_transfer;

pub use errors::{ApiError, ErrorResponse};
pub use health::{health_handler, HealthResponse};
pub use http_server::{create_app, start_server, AppState};
pub use style_transfer::{style_transfer_handler, StyleTransferResponse};
