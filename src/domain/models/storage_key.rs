// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use url::Url;

const UNKNOWN_HOST: &str = "unknown-host";

/// 对象存储键
///
/// 格式为 `<category>/<hostname>/<timestamp>.<extension>`，时间戳为 Unix 毫秒。
/// 同一 URL 的重复提交会得到不同的键。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn derive(category: &str, url: &Url, timestamp_ms: i64, extension: &str) -> Self {
        let host = url
            .host_str()
            .map(|h| h.to_ascii_lowercase())
            .unwrap_or_else(|| UNKNOWN_HOST.to_string());
        Self(format!("{category}/{host}/{timestamp_ms}.{extension}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
