// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;
use crate::style::StyleModelManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: Option<String>,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

impl HealthResponse {
    pub fn from_manager(manager: &StyleModelManager) -> Self {
        let mut issues = Vec::new();
        if !manager.has_model() {
            issues.push(format!(
                "Style model not loaded: {}",
                manager.load_error().unwrap_or("unknown reason")
            ));
        }

        Self {
            status: if issues.is_empty() { "healthy" } else { "degraded" }.to_string(),
            model: manager.model_name(),
            version: crate::version::VERSION.to_string(),
            issues: if issues.is_empty() { None } else { Some(issues) },
        }
    }
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_manager(&state.model_manager))
}
