// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use regex::Regex;
use rendrs::domain::models::render_option::RenderOption;
use rendrs::infrastructure::storage::UploadMode;
use serde_json::Value;

use super::helpers::{create_test_app, create_test_app_with, FakeRenderer, PDF_BYTES, PNG_BYTES};

fn form(option: &str, url: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("options", option.to_string())
        .add_text("url", url.to_string())
}

/// 每个选项都走到正确的响应形状
#[tokio::test]
async fn every_option_uses_its_response_shape() {
    for option in RenderOption::ALL {
        let app = create_test_app();
        let response = app
            .server
            .post("/api/render")
            .multipart(form(option.as_str(), "https://example.com"))
            .await;

        response.assert_status_ok();
        let content_type = response
            .header("content-type")
            .to_str()
            .unwrap()
            .to_string();

        if option.is_binary() {
            assert!(!content_type.contains("json"), "{} returned {}", option, content_type);
        } else {
            assert!(content_type.starts_with("application/json"), "{} returned {}", option, content_type);
            let body: Value = response.json();
            assert_eq!(body["error"], false);
            assert!(body.get("data").is_some());
            assert_eq!(body.get("r2Key").is_some(), option == RenderOption::Markdown);
        }

        assert_eq!(app.renderer.calls().len(), 1, "{} made more than one call", option);
    }
}

#[tokio::test]
async fn pdf_returns_bytes_with_storage_key_header() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/render")
        .multipart(form("/pdf", "https://Example.com/report"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(response.as_bytes().as_ref(), PDF_BYTES);

    let key = response.header("x-r2-key").to_str().unwrap().to_string();
    let pattern = Regex::new(r"^pdf/example\.com/\d+\.pdf$").unwrap();
    assert!(pattern.is_match(&key), "unexpected key {}", key);

    let stored = app.storage.get(&key).await.expect("pdf was not stored");
    assert_eq!(stored.mode, UploadMode::Multipart);
    assert_eq!(stored.data.as_ref(), PDF_BYTES);
}

#[tokio::test]
async fn screenshot_returns_png_without_storage() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/render")
        .multipart(form("/screenshot", "https://example.com"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(response.as_bytes().as_ref(), PNG_BYTES);
    assert!(response.maybe_header("x-r2-key").is_none());
    assert!(app.storage.keys().await.is_empty());
}

#[tokio::test]
async fn markdown_envelope_carries_storage_key() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/render")
        .multipart(form("/markdown", "https://example.com/docs"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"], "# Example Domain");

    let key = body["r2Key"].as_str().unwrap();
    let pattern = Regex::new(r"^markdown/example\.com/\d+\.md$").unwrap();
    assert!(pattern.is_match(key), "unexpected key {}", key);

    let stored = app.storage.get(key).await.unwrap();
    assert_eq!(stored.mode, UploadMode::Put);
    assert!(stored.content_type.starts_with("text/markdown"));
}

#[tokio::test]
async fn repeated_markdown_submissions_get_distinct_keys() {
    let app = create_test_app();
    let mut keys = Vec::new();
    for _ in 0..2 {
        let body: Value = app
            .server
            .post("/api/render")
            .multipart(form("/markdown", "https://example.com"))
            .await
            .json();
        keys.push(body["r2Key"].as_str().unwrap().to_string());
    }

    assert_ne!(keys[0], keys[1]);
    assert_eq!(app.storage.keys().await.len(), 2);
}

#[tokio::test]
async fn unknown_option_falls_back_to_content() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/render")
        .multipart(form("/basic", "https://example.com"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["data"].as_str().unwrap().contains("<html>"));
    assert_eq!(app.renderer.calls(), vec!["content".to_string()]);
}

#[tokio::test]
async fn missing_option_also_falls_back_to_content() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/render")
        .multipart(MultipartForm::new().add_text("url", "https://example.com"))
        .await;

    response.assert_status_ok();
    assert_eq!(app.renderer.calls(), vec!["content".to_string()]);
}

#[tokio::test]
async fn scrape_uses_heading_and_anchor_selectors() {
    let app = create_test_app();
    app.server
        .post("/api/render")
        .multipart(form("/scrape", "https://example.com"))
        .await
        .assert_status_ok();

    assert_eq!(app.renderer.calls(), vec!["scrape:h1,a".to_string()]);
}

#[tokio::test]
async fn json_extraction_forwards_prompt() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/render")
        .multipart(form("/json", "https://example.com").add_text("prompt", "Get the title"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Example Domain");
    assert_eq!(app.renderer.calls(), vec!["json:Get the title".to_string()]);
}

#[tokio::test]
async fn links_are_wrapped_in_envelope() {
    let app = create_test_app();
    let body: Value = app
        .server
        .post("/api/render")
        .multipart(form("/links", "https://example.com"))
        .await
        .json();

    assert_eq!(
        body,
        serde_json::json!({
            "error": false,
            "data": ["https://www.iana.org/domains/example"]
        })
    );
}

#[tokio::test]
async fn missing_url_is_rejected_before_dispatch() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/render")
        .multipart(MultipartForm::new().add_text("options", "/pdf"))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("url"));
    assert!(app.renderer.calls().is_empty());
}

#[tokio::test]
async fn invalid_url_is_rejected_before_dispatch() {
    let app = create_test_app();
    let response = app
        .server
        .post("/api/render")
        .multipart(form("/content", "not a url"))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.renderer.calls().is_empty());
}

#[tokio::test]
async fn upstream_failure_surfaces_as_server_error() {
    let app = create_test_app_with(FakeRenderer::failing());
    let response = app
        .server
        .post("/api/render")
        .multipart(form("/markdown", "https://example.com"))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Authentication error"));
    assert!(app.storage.keys().await.is_empty());
}
