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
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::debug;
use url::Url;

use crate::config::settings::RenderingSettings;
use crate::domain::services::rendering_service::{
    BrowserRenderingService, RenderingError, ScrapeElement, Snapshot,
};

/// 截图解码：填充可有可无，末尾多余比特不报错
const SCREENSHOT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Cloudflare Browser Rendering REST 客户端
///
/// 每个操作对应 `POST {base}/accounts/{account_id}/browser-rendering/{endpoint}`，
/// 使用 Bearer 令牌认证。不设置额外超时，也不重试。
pub struct CloudflareRenderingClient {
    client: reqwest::Client,
    base_url: String,
    account_id: String,
    api_token: String,
}

#[derive(Serialize)]
struct RenderBody<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    elements: Option<&'a [ScrapeElement]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
}

impl<'a> RenderBody<'a> {
    fn url(url: &'a Url) -> Self {
        Self {
            url: url.as_str(),
            elements: None,
            prompt: None,
        }
    }
}

/// Cloudflare API 通用响应信封
#[derive(Deserialize, Debug)]
struct ApiEnvelope<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Deserialize, Debug)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

impl CloudflareRenderingClient {
    pub fn new(
        base_url: impl Into<String>,
        account_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            account_id: account_id.into(),
            api_token: api_token.into(),
        }
    }

    pub fn from_settings(settings: &RenderingSettings) -> Self {
        Self::new(
            settings.base_url.clone(),
            settings.account_id.clone(),
            settings.api_token.clone(),
        )
    }

    fn endpoint(&self, operation: &str) -> String {
        format!(
            "{}/accounts/{}/browser-rendering/{}",
            self.base_url, self.account_id, operation
        )
    }

    async fn send(
        &self,
        operation: &str,
        body: &RenderBody<'_>,
    ) -> Result<reqwest::Response, RenderingError> {
        let start = Instant::now();
        let resp = self
            .client
            .post(self.endpoint(operation))
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;

        debug!(
            "browser-rendering/{} answered {} in {}ms",
            operation,
            resp.status(),
            start.elapsed().as_millis()
        );

        Ok(resp)
    }

    /// 调用返回 JSON 信封的操作并解出 `result`
    async fn call_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        body: &RenderBody<'_>,
    ) -> Result<T, RenderingError> {
        let resp = self.send(operation, body).await?;
        let status = resp.status();
        let text = resp.text().await?;

        let envelope: ApiEnvelope<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(RenderingError::Decode(e.to_string())),
            Err(_) => {
                return Err(RenderingError::Api {
                    status: status.as_u16(),
                    messages: vec![text],
                })
            }
        };

        if !status.is_success() || !envelope.success {
            return Err(RenderingError::Api {
                status: status.as_u16(),
                messages: envelope
                    .errors
                    .into_iter()
                    .map(|e| match e.code {
                        Some(code) => format!("{}: {}", code, e.message),
                        None => e.message,
                    })
                    .collect(),
            });
        }

        envelope
            .result
            .ok_or_else(|| RenderingError::Decode(format!("{} returned no result", operation)))
    }

    /// 调用直接返回二进制的操作
    async fn call_binary(
        &self,
        operation: &str,
        body: &RenderBody<'_>,
    ) -> Result<Bytes, RenderingError> {
        let resp = self.send(operation, body).await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let messages = serde_json::from_str::<ApiEnvelope<Value>>(&text)
                .map(|envelope| envelope.errors.into_iter().map(|e| e.message).collect())
                .unwrap_or_else(|_| vec![text]);
            return Err(RenderingError::Api {
                status: status.as_u16(),
                messages,
            });
        }
        Ok(resp.bytes().await?)
    }
}

#[async_trait]
impl BrowserRenderingService for CloudflareRenderingClient {
    async fn content(&self, url: &Url) -> Result<String, RenderingError> {
        self.call_json("content", &RenderBody::url(url)).await
    }

    async fn screenshot(&self, url: &Url) -> Result<Bytes, RenderingError> {
        // Served from the snapshot endpoint, which carries the PNG as base64.
        let snapshot = self.snapshot(url).await?;
        let compact: String = snapshot
            .screenshot
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let png = SCREENSHOT_ENGINE
            .decode(compact)
            .map_err(|e| RenderingError::Decode(format!("screenshot is not base64: {}", e)))?;
        Ok(Bytes::from(png))
    }

    async fn pdf(&self, url: &Url) -> Result<Bytes, RenderingError> {
        self.call_binary("pdf", &RenderBody::url(url)).await
    }

    async fn snapshot(&self, url: &Url) -> Result<Snapshot, RenderingError> {
        self.call_json("snapshot", &RenderBody::url(url)).await
    }

    async fn scrape(&self, url: &Url, elements: &[ScrapeElement]) -> Result<Value, RenderingError> {
        let body = RenderBody {
            elements: Some(elements),
            ..RenderBody::url(url)
        };
        self.call_json("scrape", &body).await
    }

    async fn json(&self, url: &Url, prompt: Option<&str>) -> Result<Value, RenderingError> {
        let body = RenderBody {
            prompt,
            ..RenderBody::url(url)
        };
        self.call_json("json", &body).await
    }

    async fn links(&self, url: &Url) -> Result<Vec<String>, RenderingError> {
        self.call_json("links", &RenderBody::url(url)).await
    }

    async fn markdown(&self, url: &Url) -> Result<String, RenderingError> {
        self.call_json("markdown", &RenderBody::url(url)).await
    }

    fn name(&self) -> &'static str {
        "cloudflare_browser_rendering"
    }
}
