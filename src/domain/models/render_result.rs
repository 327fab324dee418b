// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CONTENT_TYPE_PNG: &str = "image/png";
pub const CONTENT_TYPE_PDF: &str = "application/pdf";
pub const CONTENT_TYPE_MARKDOWN: &str = "text/markdown; charset=utf-8";

/// 二进制产物（截图、PDF），原样返回，不做 base64 包装
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryArtifact {
    pub bytes: Bytes,
    pub content_type: &'static str,
    /// 已写入对象存储时的键
    pub storage_key: Option<String>,
}

/// JSON 响应信封 `{ error, data, r2Key? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub error: bool,
    pub data: Value,
    #[serde(rename = "r2Key", skip_serializing_if = "Option::is_none", default)]
    pub r2_key: Option<String>,
}

impl JsonEnvelope {
    /// 成功信封
    pub fn ok(data: Value) -> Self {
        Self {
            error: false,
            data,
            r2_key: None,
        }
    }

    pub fn with_r2_key(mut self, key: String) -> Self {
        self.r2_key = Some(key);
        self
    }
}

/// 渲染结果
///
/// 按选项区分的判别联合，调用方无需嗅探响应形状
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Binary(BinaryArtifact),
    Json(JsonEnvelope),
}

impl RenderOutcome {
    pub fn storage_key(&self) -> Option<&str> {
        match self {
            RenderOutcome::Binary(artifact) => artifact.storage_key.as_deref(),
            RenderOutcome::Json(envelope) => envelope.r2_key.as_deref(),
        }
    }
}
