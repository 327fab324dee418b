// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 未知渲染选项错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid option selected: {0}")]
pub struct UnknownRenderOption(pub String);

/// 渲染选项
///
/// 表单中可选择的八种浏览器渲染方式，序列化为带前导斜杠的取值（如 `/pdf`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderOption {
    /// 获取渲染后的完整 HTML
    #[serde(rename = "/content")]
    Content,
    /// 页面截图 (PNG)
    #[serde(rename = "/screenshot")]
    Screenshot,
    /// 生成 PDF 文档
    #[serde(rename = "/pdf")]
    Pdf,
    /// HTML 与截图组合快照
    #[serde(rename = "/snapshot")]
    Snapshot,
    /// 按选择器抓取元素
    #[serde(rename = "/scrape")]
    Scrape,
    /// 基于提示词的 JSON 提取
    #[serde(rename = "/json")]
    Json,
    /// 提取页面链接
    #[serde(rename = "/links")]
    Links,
    /// 转换为 Markdown
    #[serde(rename = "/markdown")]
    Markdown,
}

impl RenderOption {
    /// 按表单展示顺序排列的全部选项
    pub const ALL: [RenderOption; 8] = [
        RenderOption::Content,
        RenderOption::Screenshot,
        RenderOption::Pdf,
        RenderOption::Snapshot,
        RenderOption::Scrape,
        RenderOption::Json,
        RenderOption::Links,
        RenderOption::Markdown,
    ];

    /// 表单提交时使用的取值
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderOption::Content => "/content",
            RenderOption::Screenshot => "/screenshot",
            RenderOption::Pdf => "/pdf",
            RenderOption::Snapshot => "/snapshot",
            RenderOption::Scrape => "/scrape",
            RenderOption::Json => "/json",
            RenderOption::Links => "/links",
            RenderOption::Markdown => "/markdown",
        }
    }

    /// 选择器旁边显示的说明文字
    pub fn description(&self) -> &'static str {
        match self {
            RenderOption::Content => "Get the content of a website.",
            RenderOption::Screenshot => "Take a screenshot of a website.",
            RenderOption::Pdf => "Convert a website to PDF.",
            RenderOption::Snapshot => "Take a snapshot of a website.",
            RenderOption::Scrape => "Scrape a website for data.",
            RenderOption::Json => "Get the JSON representation of a website.",
            RenderOption::Links => "Get all the links on a website.",
            RenderOption::Markdown => "Convert a website to Markdown.",
        }
    }

    /// 宽松解析服务端收到的取值
    ///
    /// 无法识别的取值（包括空串）回退到 [`RenderOption::Content`]，
    /// 服务端从不因为选项未知而失败。
    pub fn from_form_value(value: &str) -> Self {
        value.parse().unwrap_or(RenderOption::Content)
    }

    /// 是否以原始二进制返回（不经过 JSON 包装）
    pub fn is_binary(&self) -> bool {
        matches!(self, RenderOption::Screenshot | RenderOption::Pdf)
    }

    /// 需要写入对象存储时的键前缀
    pub fn storage_category(&self) -> Option<&'static str> {
        match self {
            RenderOption::Pdf => Some("pdf"),
            RenderOption::Markdown => Some("markdown"),
            _ => None,
        }
    }

    /// 存储产物的文件扩展名
    pub fn artifact_extension(&self) -> Option<&'static str> {
        match self {
            RenderOption::Pdf => Some("pdf"),
            RenderOption::Markdown => Some("md"),
            _ => None,
        }
    }
}

impl fmt::Display for RenderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderOption {
    type Err = UnknownRenderOption;

    /// 严格解析，接受 `/pdf`、`pdf`、`PDF` 等写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix('/').unwrap_or(trimmed);
        RenderOption::ALL
            .into_iter()
            .find(|option| option.as_str()[1..].eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownRenderOption(s.to_string()))
    }
}
