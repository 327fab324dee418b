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

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// 渲染服务错误类型
#[derive(Error, Debug)]
pub enum RenderingError {
    /// 请求失败
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 服务端返回失败
    #[error("Rendering API error ({status}): {}", .messages.join("; "))]
    Api { status: u16, messages: Vec<String> },
    /// 响应无法解析
    #[error("Decode error: {0}")]
    Decode(String),
}

/// 抓取选择器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeElement {
    pub selector: String,
}

impl ScrapeElement {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// 固定的抓取选择器集合：标题与链接
    pub fn defaults() -> Vec<ScrapeElement> {
        vec![ScrapeElement::new("h1"), ScrapeElement::new("a")]
    }
}

/// 组合快照：HTML 与 base64 编码的截图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub content: String,
    pub screenshot: String,
}

/// 浏览器渲染服务特质
///
/// 每个方法对应上游服务的一个操作，账号标识由实现持有
#[async_trait]
pub trait BrowserRenderingService: Send + Sync {
    /// 获取渲染后的 HTML
    async fn content(&self, url: &Url) -> Result<String, RenderingError>;

    /// 页面截图，返回 PNG 字节
    async fn screenshot(&self, url: &Url) -> Result<Bytes, RenderingError>;

    /// 生成 PDF
    async fn pdf(&self, url: &Url) -> Result<Bytes, RenderingError>;

    /// HTML 与截图组合快照
    async fn snapshot(&self, url: &Url) -> Result<Snapshot, RenderingError>;

    /// 按选择器抓取元素
    async fn scrape(&self, url: &Url, elements: &[ScrapeElement]) -> Result<Value, RenderingError>;

    /// 基于提示词的结构化提取
    async fn json(&self, url: &Url, prompt: Option<&str>) -> Result<Value, RenderingError>;

    /// 提取页面链接
    async fn links(&self, url: &Url) -> Result<Vec<String>, RenderingError>;

    /// 转换为 Markdown
    async fn markdown(&self, url: &Url) -> Result<String, RenderingError>;

    /// 服务名称
    fn name(&self) -> &'static str;
}
