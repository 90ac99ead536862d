// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod file_store;

pub use file_store::{
    is_safe_file_name, output_file_name, resolve_in, sanitize_file_name, FileStore,
};
