// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod storage;
pub mod style;
pub mod version;

pub use api::{create_app, start_server, AppState};
pub use config::{ServiceConfig, TransferSettings};
pub use storage::FileStore;
pub use style::{StyleModel, StyleModelConfig, StyleModelManager};
