// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared helpers for the integration tests

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
};
use image::{ImageBuffer, ImageFormat, Rgb};
use ndarray::Array4;
use std::io::Cursor;
use std::sync::Arc;
use style_transfer_node::{
    api::AppState, config::TransferSettings, storage::FileStore, style::StyleModel,
    StyleModelManager,
};
use tempfile::TempDir;

pub const BOUNDARY: &str = "----style-transfer-test-boundary";

pub const INDEX_HTML: &str = "<!DOCTYPE html><html><body>style transfer</body></html>";

/// Blends each content pixel with the mean style colour
pub struct MeanColourModel;

impl StyleModel for MeanColourModel {
    fn name(&self) -> &str {
        "mean-colour"
    }

    fn stylize(&self, content: &Array4<f32>, style: &Array4<f32>) -> Result<Array4<f32>> {
        let pixels = (style.len() / 3) as f32;
        let mut mean = [0.0f32; 3];
        for ((_, _, _, c), value) in style.indexed_iter() {
            mean[c] += value / pixels;
        }

        let mut out = content.clone();
        for ((_, _, _, c), value) in out.indexed_iter_mut() {
            *value = 0.5 * *value + 0.5 * mean[c];
        }
        Ok(out)
    }
}

/// Always fails inference
pub struct FailingModel;

impl StyleModel for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    fn stylize(&self, _content: &Array4<f32>, _style: &Array4<f32>) -> Result<Array4<f32>> {
        anyhow::bail!("inference backend crashed")
    }
}

/// Encode a solid-colour image in the given format
pub fn encoded_image(format: ImageFormat, width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Rgb(colour));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

pub fn png(width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
    encoded_image(ImageFormat::Png, width, height, colour)
}

pub fn jpeg(width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
    encoded_image(ImageFormat::Jpeg, width, height, colour)
}

/// One part of a multipart form
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, file_name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            data,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    part.name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn style_transfer_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/style-transfer")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Service state rooted in a temporary directory
pub struct TestEnv {
    pub root: TempDir,
    pub state: AppState,
}

impl TestEnv {
    pub async fn with_model(model: Option<Arc<dyn StyleModel>>) -> Self {
        Self::with_settings(model, TransferSettings::default()).await
    }

    pub async fn with_settings(
        model: Option<Arc<dyn StyleModel>>,
        settings: TransferSettings,
    ) -> Self {
        let root = TempDir::new().unwrap();

        let static_dir = root.path().join("static");
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(static_dir.join("script.js"), "console.log('ok');").unwrap();

        let store = FileStore::new(root.path().join("uploads"), root.path().join("outputs"))
            .await
            .unwrap();

        let manager = match model {
            Some(model) => StyleModelManager::with_model(model),
            None => StyleModelManager::unavailable("no model in test"),
        };

        let state = AppState::new(manager, store, settings, static_dir);
        Self { root, state }
    }

    pub fn app(&self) -> axum::Router {
        style_transfer_node::create_app(self.state.clone())
    }

    pub fn upload_files(&self) -> Vec<std::path::PathBuf> {
        list_files(self.state.store.upload_dir())
    }

    pub fn output_files(&self) -> Vec<std::path::PathBuf> {
        list_files(self.state.store.output_dir())
    }
}

fn list_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}
