// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bytes::Bytes;
use reqwest::multipart::Form;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::form::ValidatedForm;
use crate::application::dto::render_form::{FIELD_OPTIONS, FIELD_PROMPT, FIELD_URL};
use crate::presentation::handlers::render_handler::R2_KEY_HEADER;

/// 客户端错误类型
#[derive(Error, Debug)]
pub enum ComposerError {
    /// 网络或解析失败
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 服务端返回非 2xx
    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },
    /// 本地保存二进制结果失败
    #[error("failed to keep response locally: {0}")]
    Blob(#[from] std::io::Error),
}

/// 服务端响应，按提交的选项区分
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResponse {
    /// 截图或 PDF 的原始字节
    Blob {
        bytes: Bytes,
        content_type: String,
        r2_key: Option<String>,
    },
    /// 原样保存的 JSON 响应
    Json(Value),
}

/// 渲染接口客户端
///
/// 每次提交只发一个 POST，不重试也不可取消
pub struct ComposerClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl ComposerClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// 构造 multipart 表单，提示词为空时省略
    pub fn build_form(form: &ValidatedForm) -> Form {
        let multipart = Form::new()
            .text(FIELD_OPTIONS, form.option.as_str())
            .text(FIELD_URL, form.url.to_string());
        match &form.prompt {
            Some(prompt) => multipart.text(FIELD_PROMPT, prompt.clone()),
            None => multipart,
        }
    }

    /// 提交表单并按选项解释响应
    pub async fn submit(&self, form: &ValidatedForm) -> Result<RenderResponse, ComposerError> {
        debug!("submitting {} for {}", form.option, form.url);

        let resp = self
            .client
            .post(self.endpoint.clone())
            .multipart(Self::build_form(form))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ComposerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if form.option.is_binary() {
            let header = |name: &str| {
                resp.headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            let content_type = header(reqwest::header::CONTENT_TYPE.as_str())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let r2_key = header(R2_KEY_HEADER);
            let bytes = resp.bytes().await?;
            Ok(RenderResponse::Blob {
                bytes,
                content_type,
                r2_key,
            })
        } else {
            Ok(RenderResponse::Json(resp.json::<Value>().await?))
        }
    }
}
