// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::models::render_option::RenderOption;
use crate::domain::models::render_request::RenderRequest;

pub const FIELD_OPTIONS: &str = "options";
pub const FIELD_URL: &str = "url";
pub const FIELD_PROMPT: &str = "prompt";

/// 渲染表单数据传输对象
///
/// 服务端与客户端共用的表单结构，字段名与 multipart 表单一致
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct RenderFormDto {
    /// 渲染选项，如 `/pdf`
    #[validate(
        length(min = 1, message = "Please select an option."),
        custom(function = "validate_option", message = "Invalid option selected.")
    )]
    pub options: String,
    /// 目标页面
    #[validate(
        length(min = 1, message = "URL is required."),
        url(message = "Please enter a valid URL.")
    )]
    pub url: String,
    /// 提示词
    pub prompt: Option<String>,
}

fn validate_option(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<RenderOption>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("option"))
}

impl RenderFormDto {
    /// 服务端校验
    ///
    /// 只要求 URL 存在且合法；未知选项交给分发时的回退策略处理
    pub fn validate_for_dispatch(&self) -> Result<(), ValidationErrors> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(mut errors) => {
                errors.0.remove(FIELD_OPTIONS);
                if errors.0.is_empty() {
                    Ok(())
                } else {
                    Err(errors)
                }
            }
        }
    }

    /// 转换为领域请求，选项按宽松规则解析
    pub fn into_request(self) -> Result<RenderRequest, url::ParseError> {
        let url = url::Url::parse(self.url.trim())?;
        Ok(RenderRequest::new(
            RenderOption::from_form_value(&self.options),
            url,
            self.prompt,
        ))
    }
}

/// 把校验错误整理为“字段 -> 首条消息”
///
/// 同一字段有多条错误时，缺失类错误优先于格式类错误
pub fn first_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            let chosen = field_errors
                .iter()
                .find(|e| e.code == "length")
                .or_else(|| field_errors.first())?;
            let message = chosen
                .message
                .clone()
                .unwrap_or_else(|| Cow::Owned(chosen.code.to_string()));
            Some((field.to_string(), message.to_string()))
        })
        .collect();
    messages.sort();
    messages
}
