// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

use super::render_option::RenderOption;

/// 渲染请求
///
/// 一次表单提交对应一个请求，生命周期仅限于单次请求/响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// 渲染选项
    pub option: RenderOption,
    /// 目标页面
    pub url: Url,
    /// 提示词，仅对 JSON 提取有意义
    pub prompt: Option<String>,
}

impl RenderRequest {
    /// 创建渲染请求，空白提示词视为未提供
    pub fn new(option: RenderOption, url: Url, prompt: Option<String>) -> Self {
        let prompt = prompt
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        Self {
            option,
            url,
            prompt,
        }
    }

    /// 目标主机名，小写
    pub fn host(&self) -> Option<String> {
        self.url.host_str().map(|h| h.to_ascii_lowercase())
    }
}
