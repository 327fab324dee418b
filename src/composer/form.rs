// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::fmt;
use url::Url;
use validator::Validate;

use crate::application::dto::render_form::{first_messages, RenderFormDto};
use crate::domain::models::render_option::RenderOption;

/// 用户填写的表单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderForm {
    pub option: String,
    pub url: String,
    pub prompt: String,
}

impl Default for RenderForm {
    fn default() -> Self {
        Self {
            option: RenderOption::Content.as_str().to_string(),
            url: String::new(),
            prompt: String::new(),
        }
    }
}

/// 通过校验、可以提交的表单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub option: RenderOption,
    pub url: Url,
    pub prompt: Option<String>,
}

/// 字段级校验错误，键为字段名
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub BTreeMap<String, String>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

impl std::error::Error for FormErrors {}

impl RenderForm {
    pub fn new(option: impl Into<String>, url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            url: url.into(),
            prompt: prompt.into(),
        }
    }

    /// 提交前校验
    ///
    /// 选项必须属于固定集合，URL 必须非空且语法合法，提示词不做限制
    pub fn validate(&self) -> Result<ValidatedForm, FormErrors> {
        let dto = RenderFormDto {
            options: self.option.trim().to_string(),
            url: self.url.trim().to_string(),
            prompt: None,
        };

        if let Err(errors) = dto.validate() {
            return Err(FormErrors(first_messages(&errors).into_iter().collect()));
        }

        let mut errors = BTreeMap::new();
        let option = dto.options.parse::<RenderOption>();
        let url = Url::parse(&dto.url);
        if option.is_err() {
            errors.insert("options".to_string(), "Invalid option selected.".to_string());
        }
        if url.is_err() {
            errors.insert("url".to_string(), "Please enter a valid URL.".to_string());
        }

        match (option, url) {
            (Ok(option), Ok(url)) => {
                let prompt = Some(self.prompt.trim().to_string()).filter(|p| !p.is_empty());
                Ok(ValidatedForm {
                    option,
                    url,
                    prompt,
                })
            }
            _ => Err(FormErrors(errors)),
        }
    }
}
