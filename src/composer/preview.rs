// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use url::Url;

use super::blob::BlobRef;
use crate::domain::models::render_option::RenderOption;

/// 代码查看器的语言提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    Markdown,
    Html,
    Json,
}

impl CodeLanguage {
    pub fn for_option(option: RenderOption) -> Self {
        match option {
            RenderOption::Markdown => CodeLanguage::Markdown,
            RenderOption::Snapshot => CodeLanguage::Html,
            _ => CodeLanguage::Json,
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            CodeLanguage::Markdown => "markdown",
            CodeLanguage::Html => "html",
            CodeLanguage::Json => "json",
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            CodeLanguage::Markdown => "response.md",
            CodeLanguage::Html => "response.html",
            CodeLanguage::Json => "response.json",
        }
    }
}

/// 已落定的响应
#[derive(Debug, Clone, PartialEq)]
pub enum SettledResponse {
    /// 保存在本地的二进制结果
    Blob {
        blob: BlobRef,
        r2_key: Option<String>,
    },
    /// 原样保存的 JSON
    Json(Value),
}

/// 预览面板内容
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// 嵌入的实时页面
    LivePage { src: String },
    /// 嵌入的文档框架
    DocumentFrame { src: String },
    /// 只读代码查看器
    CodeViewer {
        language: CodeLanguage,
        filename: &'static str,
        text: String,
    },
}

impl Preview {
    /// 由（选项，响应）决定预览，纯函数
    pub fn from_response(option: RenderOption, url: &Url, response: &SettledResponse) -> Self {
        match (option, response) {
            (RenderOption::Content, _) => Preview::LivePage {
                src: url.to_string(),
            },
            (RenderOption::Screenshot, SettledResponse::Blob { blob, .. }) => Preview::LivePage {
                src: blob.url(),
            },
            (RenderOption::Pdf, SettledResponse::Blob { blob, .. }) => Preview::DocumentFrame {
                src: blob.url(),
            },
            (_, SettledResponse::Json(value)) => code_viewer(option, value),
            // A JSON option never settles as a blob; show where the bytes went.
            (_, SettledResponse::Blob { blob, .. }) => Preview::LivePage { src: blob.url() },
        }
    }
}

fn code_viewer(option: RenderOption, value: &Value) -> Preview {
    let language = CodeLanguage::for_option(option);
    let text = match (language, value.get("data")) {
        (CodeLanguage::Markdown | CodeLanguage::Html, Some(Value::String(body))) => body.clone(),
        _ => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
    };
    Preview::CodeViewer {
        language,
        filename: language.filename(),
        text,
    }
}
