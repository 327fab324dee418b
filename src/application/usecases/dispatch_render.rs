// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use bytes::Bytes;
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::domain::models::render_option::RenderOption;
use crate::domain::models::render_request::RenderRequest;
use crate::domain::models::render_result::{
    BinaryArtifact, JsonEnvelope, RenderOutcome, CONTENT_TYPE_MARKDOWN, CONTENT_TYPE_PDF,
    CONTENT_TYPE_PNG,
};
use crate::domain::models::storage_key::StorageKey;
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};
use crate::domain::services::rendering_service::{
    BrowserRenderingService, RenderingError, ScrapeElement,
};
use crate::infrastructure::metrics;

/// 分发错误类型
///
/// 上游失败原样向上传播，不做重试或部分恢复
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("rendering service failed: {0}")]
    Rendering(#[from] RenderingError),
    #[error("object storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to encode rendering result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 渲染分发用例
///
/// 每个请求恰好调用一次渲染服务；PDF 与 Markdown 额外写一次对象存储
pub struct RenderDispatcher {
    renderer: Arc<dyn BrowserRenderingService>,
    storage: Arc<dyn StorageRepository>,
    /// 最近一次分配给存储键的毫秒时间戳
    last_key_timestamp: AtomicI64,
}

impl RenderDispatcher {
    pub fn new(
        renderer: Arc<dyn BrowserRenderingService>,
        storage: Arc<dyn StorageRepository>,
    ) -> Self {
        Self {
            renderer,
            storage,
            last_key_timestamp: AtomicI64::new(0),
        }
    }

    /// 执行分发
    #[instrument(skip(self, request), fields(option = %request.option, url = %request.url))]
    pub async fn dispatch(&self, request: &RenderRequest) -> Result<RenderOutcome, DispatchError> {
        let start = Instant::now();
        let result = self.dispatch_inner(request).await;
        metrics::record_render(request.option, start.elapsed(), result.is_ok());

        match &result {
            Ok(outcome) => info!(
                storage_key = outcome.storage_key().unwrap_or("-"),
                "render completed in {}ms",
                start.elapsed().as_millis()
            ),
            Err(e) => error!("render failed via {}: {}", self.renderer.name(), e),
        }

        result
    }

    async fn dispatch_inner(&self, request: &RenderRequest) -> Result<RenderOutcome, DispatchError> {
        let url = &request.url;

        let outcome = match request.option {
            RenderOption::Content => json(self.renderer.content(url).await?),
            RenderOption::Screenshot => RenderOutcome::Binary(BinaryArtifact {
                bytes: self.renderer.screenshot(url).await?,
                content_type: CONTENT_TYPE_PNG,
                storage_key: None,
            }),
            RenderOption::Pdf => {
                let pdf = self.renderer.pdf(url).await?;
                let key = self.store(request, pdf.clone(), CONTENT_TYPE_PDF).await?;
                RenderOutcome::Binary(BinaryArtifact {
                    bytes: pdf,
                    content_type: CONTENT_TYPE_PDF,
                    storage_key: Some(key),
                })
            }
            RenderOption::Snapshot => json(self.renderer.snapshot(url).await?.content),
            RenderOption::Scrape => {
                let elements = ScrapeElement::defaults();
                RenderOutcome::Json(JsonEnvelope::ok(
                    self.renderer.scrape(url, &elements).await?,
                ))
            }
            RenderOption::Json => RenderOutcome::Json(JsonEnvelope::ok(
                self.renderer.json(url, request.prompt.as_deref()).await?,
            )),
            RenderOption::Links => {
                RenderOutcome::Json(JsonEnvelope::ok(serde_json::to_value(
                    self.renderer.links(url).await?,
                )?))
            }
            RenderOption::Markdown => {
                let markdown = self.renderer.markdown(url).await?;
                let key = self
                    .store(
                        request,
                        Bytes::from(markdown.clone()),
                        CONTENT_TYPE_MARKDOWN,
                    )
                    .await?;
                RenderOutcome::Json(JsonEnvelope::ok(Value::String(markdown)).with_r2_key(key))
            }
        };

        Ok(outcome)
    }

    /// 写入对象存储并返回键
    ///
    /// PDF 走分片上传，Markdown 走单次写入
    async fn store(
        &self,
        request: &RenderRequest,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, DispatchError> {
        let (Some(category), Some(extension)) = (
            request.option.storage_category(),
            request.option.artifact_extension(),
        ) else {
            return Err(DispatchError::Storage(StorageError::Other(format!(
                "{} produces no stored artifact",
                request.option
            ))));
        };

        let key = StorageKey::derive(
            category,
            &request.url,
            self.next_key_timestamp(),
            extension,
        )
        .into_string();

        match request.option {
            RenderOption::Pdf => {
                self.storage
                    .upload_multipart(&key, data, content_type)
                    .await?
            }
            _ => self.storage.put_object(&key, data, content_type).await?,
        }

        metrics::record_upload(category);
        Ok(key)
    }
}

impl RenderDispatcher {
    /// 单调递增的毫秒时间戳
    ///
    /// 同一毫秒内的多次写入依次顺延 1ms，保证存储键互不相同
    fn next_key_timestamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_key_timestamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

fn json(text: String) -> RenderOutcome {
    RenderOutcome::Json(JsonEnvelope::ok(Value::String(text)))
}
