// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use super::preview::SettledResponse;

/// 通知默认展示时长
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// 短暂提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub ttl: Duration,
}

/// 提交状态
///
/// 只有三种状态：空闲、提交中、已落定（可能为空）
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ComposerState {
    #[default]
    Idle,
    Loading,
    Settled(Option<SettledResponse>),
}

impl ComposerState {
    /// 开始提交；已有请求在途时返回 false
    pub fn begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = ComposerState::Loading;
        true
    }

    pub fn settle(&mut self, response: Option<SettledResponse>) {
        *self = ComposerState::Settled(response);
    }

    /// 失败后回到空闲并给出提示，不重试
    pub fn fail(&mut self, detail: impl std::fmt::Display) -> Notification {
        *self = ComposerState::Idle;
        Notification {
            message: format!("Something went wrong: {}", detail),
            ttl: NOTIFICATION_TTL,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ComposerState::Loading)
    }

    pub fn response(&self) -> Option<&SettledResponse> {
        match self {
            ComposerState::Settled(response) => response.as_ref(),
            _ => None,
        }
    }
}
