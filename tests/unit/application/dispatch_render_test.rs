// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use bytes::Bytes;
use rendrs::application::usecases::dispatch_render::{DispatchError, RenderDispatcher};
use rendrs::domain::models::render_option::RenderOption;
use rendrs::domain::models::render_request::RenderRequest;
use rendrs::domain::models::render_result::RenderOutcome;
use rendrs::domain::repositories::storage_repository::{StorageError, StorageRepository};
use rendrs::domain::services::rendering_service::{
    BrowserRenderingService, RenderingError, ScrapeElement, Snapshot,
};
use rendrs::infrastructure::storage::InMemoryStorage;
use serde_json::{json, Value};
use std::sync::Arc;
use url::Url;

/// 只返回固定内容的渲染服务
struct StaticRenderer;

#[async_trait]
impl BrowserRenderingService for StaticRenderer {
    async fn content(&self, _url: &Url) -> Result<String, RenderingError> {
        Ok("<html></html>".to_string())
    }

    async fn screenshot(&self, _url: &Url) -> Result<Bytes, RenderingError> {
        Ok(Bytes::from_static(b"png"))
    }

    async fn pdf(&self, _url: &Url) -> Result<Bytes, RenderingError> {
        Ok(Bytes::from_static(b"%PDF"))
    }

    async fn snapshot(&self, _url: &Url) -> Result<Snapshot, RenderingError> {
        Ok(Snapshot {
            content: "<html>snap</html>".to_string(),
            screenshot: "c2NyZWVu".to_string(),
        })
    }

    async fn scrape(&self, _url: &Url, elements: &[ScrapeElement]) -> Result<Value, RenderingError> {
        Ok(json!(elements.iter().map(|e| e.selector.clone()).collect::<Vec<_>>()))
    }

    async fn json(&self, _url: &Url, prompt: Option<&str>) -> Result<Value, RenderingError> {
        Ok(json!({ "prompt": prompt }))
    }

    async fn links(&self, _url: &Url) -> Result<Vec<String>, RenderingError> {
        Ok(vec![])
    }

    async fn markdown(&self, _url: &Url) -> Result<String, RenderingError> {
        Ok("# md".to_string())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// 所有写入都失败的存储
struct BrokenStorage;

#[async_trait]
impl StorageRepository for BrokenStorage {
    async fn put_object(&self, _key: &str, _data: Bytes, _ct: &str) -> Result<(), StorageError> {
        Err(StorageError::Service("bucket unavailable".to_string()))
    }

    async fn upload_multipart(
        &self,
        _key: &str,
        _data: Bytes,
        _ct: &str,
    ) -> Result<(), StorageError> {
        Err(StorageError::Service("bucket unavailable".to_string()))
    }
}

fn request(option: RenderOption, prompt: Option<&str>) -> RenderRequest {
    RenderRequest::new(
        option,
        Url::parse("https://example.com/page").unwrap(),
        prompt.map(str::to_string),
    )
}

fn envelope(outcome: RenderOutcome) -> Value {
    match outcome {
        RenderOutcome::Json(envelope) => serde_json::to_value(envelope).unwrap(),
        RenderOutcome::Binary(_) => panic!("expected a JSON envelope"),
    }
}

#[tokio::test]
async fn snapshot_returns_only_the_html() {
    let dispatcher = RenderDispatcher::new(Arc::new(StaticRenderer), Arc::new(InMemoryStorage::new()));
    let outcome = dispatcher
        .dispatch(&request(RenderOption::Snapshot, None))
        .await
        .unwrap();

    assert_eq!(
        envelope(outcome),
        json!({ "error": false, "data": "<html>snap</html>" })
    );
}

#[tokio::test]
async fn scrape_requests_heading_and_anchor_elements() {
    let dispatcher = RenderDispatcher::new(Arc::new(StaticRenderer), Arc::new(InMemoryStorage::new()));
    let outcome = dispatcher
        .dispatch(&request(RenderOption::Scrape, None))
        .await
        .unwrap();

    assert_eq!(envelope(outcome)["data"], json!(["h1", "a"]));
}

#[tokio::test]
async fn blank_prompt_is_not_forwarded() {
    let dispatcher = RenderDispatcher::new(Arc::new(StaticRenderer), Arc::new(InMemoryStorage::new()));
    let outcome = dispatcher
        .dispatch(&request(RenderOption::Json, Some("   ")))
        .await
        .unwrap();

    assert_eq!(envelope(outcome)["data"], json!({ "prompt": null }));
}

#[tokio::test]
async fn only_pdf_and_markdown_touch_storage() {
    let storage = InMemoryStorage::new();
    let dispatcher = RenderDispatcher::new(Arc::new(StaticRenderer), Arc::new(storage.clone()));

    for option in RenderOption::ALL {
        let outcome = dispatcher.dispatch(&request(option, None)).await.unwrap();
        assert_eq!(
            outcome.storage_key().is_some(),
            matches!(option, RenderOption::Pdf | RenderOption::Markdown),
            "{}",
            option
        );
    }

    let keys = storage.keys().await;
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().any(|k| k.starts_with("markdown/example.com/") && k.ends_with(".md")));
    assert!(keys.iter().any(|k| k.starts_with("pdf/example.com/") && k.ends_with(".pdf")));
}

#[tokio::test]
async fn storage_failure_fails_the_request() {
    let dispatcher = RenderDispatcher::new(Arc::new(StaticRenderer), Arc::new(BrokenStorage));

    for option in [RenderOption::Pdf, RenderOption::Markdown] {
        let err = dispatcher.dispatch(&request(option, None)).await.unwrap_err();
        assert!(matches!(err, DispatchError::Storage(_)), "{}", option);
    }

    // Options without a stored artifact are unaffected.
    assert!(dispatcher
        .dispatch(&request(RenderOption::Links, None))
        .await
        .is_ok());
}

#[tokio::test]
async fn concurrent_submissions_get_distinct_keys() {
    let storage = InMemoryStorage::new();
    let dispatcher = RenderDispatcher::new(Arc::new(StaticRenderer), Arc::new(storage.clone()));
    let markdown = request(RenderOption::Markdown, None);
    let pdf = request(RenderOption::Pdf, None);

    let (first, second) = tokio::join!(dispatcher.dispatch(&markdown), dispatcher.dispatch(&markdown));
    let (third, fourth) = tokio::join!(dispatcher.dispatch(&pdf), dispatcher.dispatch(&pdf));

    let first = first.unwrap();
    let second = second.unwrap();
    assert_ne!(first.storage_key(), second.storage_key());

    let third = third.unwrap();
    let fourth = fourth.unwrap();
    assert_ne!(third.storage_key(), fourth.storage_key());

    let keys = storage.keys().await;
    assert_eq!(keys.len(), 4);
    let pattern = regex::Regex::new(r"^(markdown|pdf)/example\.com/\d+\.(md|pdf)$").unwrap();
    assert!(keys.iter().all(|k| pattern.is_match(k)), "{:?}", keys);
}
