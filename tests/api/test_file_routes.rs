// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Front-end and output route tests

use axum::http::{header, Method, Request, StatusCode};
use tower::util::ServiceExt;

use crate::common::{body_bytes, body_json, get, TestEnv, INDEX_HTML};

#[tokio::test]
async fn test_root_serves_index_html() {
    let env = TestEnv::with_model(None).await;

    let response = env.app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(body_bytes(response).await, INDEX_HTML.as_bytes());
}

#[tokio::test]
async fn test_static_asset_served() {
    let env = TestEnv::with_model(None).await;

    let response = env.app().oneshot(get("/script.js")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/javascript; charset=utf-8"
    );
}

#[tokio::test]
async fn test_missing_static_asset_returns_404() {
    let env = TestEnv::with_model(None).await;

    let response = env.app().oneshot(get("/missing.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_output_file_served_by_name() {
    let env = TestEnv::with_model(None).await;
    std::fs::write(env.state.store.output_dir().join("result.jpg"), b"\xFF\xD8\xFFdata").unwrap();

    let response = env.app().oneshot(get("/output/result.jpg")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert!(response.headers().get(header::ETAG).is_none());
    assert_eq!(body_bytes(response).await, b"\xFF\xD8\xFFdata");
}

#[tokio::test]
async fn test_missing_output_returns_404_json() {
    let env = TestEnv::with_model(None).await;

    let response = env.app().oneshot(get("/output/nope.jpg")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "not_found");
}

#[tokio::test]
async fn test_output_traversal_rejected() {
    let env = TestEnv::with_model(None).await;
    std::fs::write(env.root.path().join("secret.txt"), b"secret").unwrap();

    let response = env
        .app()
        .oneshot(get("/output/..%2Fsecret.txt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hidden_output_rejected() {
    let env = TestEnv::with_model(None).await;

    let response = env.app().oneshot(get("/output/.env")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_style_transfer_not_allowed() {
    let env = TestEnv::with_model(None).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/style-transfer")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = env.app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
