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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// Cloudflare API 默认地址
pub const DEFAULT_RENDERING_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// 配置校验错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// 必填项缺失或为空
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    /// 取值非法
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// 应用程序配置设置
///
/// 包含服务器、渲染服务、对象存储和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 浏览器渲染服务配置
    pub rendering: RenderingSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 浏览器渲染服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RenderingSettings {
    /// API 令牌
    pub api_token: String,
    /// 账号标识
    pub account_id: String,
    /// API 根地址
    pub base_url: String,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (s3, local)
    pub storage_type: String,
    /// 本地存储路径 (当 type=local 时使用)
    pub local_path: Option<String>,
    /// 存储桶名称
    pub bucket: Option<String>,
    /// S3 兼容端点（R2 为 https://<account>.r2.cloudflarestorage.com）
    pub endpoint: Option<String>,
    /// 访问密钥
    pub access_key: Option<String>,
    /// 密钥
    pub secret_key: Option<String>,
    /// 区域，R2 使用 auto
    pub region: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}`、
    /// `RENDRS__*` 环境变量，最后是 Cloudflare/R2 的常用环境变量名
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("rendering.api_token", "")?
            .set_default("rendering.account_id", "")?
            .set_default("rendering.base_url", DEFAULT_RENDERING_BASE_URL)?
            // Default Storage settings
            .set_default("storage.storage_type", "s3")?
            .set_default("storage.local_path", "./storage")?
            .set_default("storage.region", "auto")?
            // Default Metrics settings
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("RENDRS").separator("__"))
            .set_override_option("rendering.api_token", legacy_env("CLOUDFLARE_API_TOKEN"))?
            .set_override_option("rendering.account_id", legacy_env("CLOUDFLARE_ACCOUNT_ID"))?
            .set_override_option("storage.endpoint", legacy_env("R2_ENDPOINT"))?
            .set_override_option("storage.access_key", legacy_env("R2_ACCESS_KEY_ID"))?
            .set_override_option("storage.secret_key", legacy_env("R2_SECRET_ACCESS_KEY"))?
            .set_override_option("storage.bucket", legacy_env("R2_BUCKET_NAME"))?;

        builder.build()?.try_deserialize()
    }

    /// 启动时校验必填项
    ///
    /// 缺失的凭据在启动阶段直接报错，而不是以空串发起上游请求
    pub fn validate(&self) -> Result<(), SettingsError> {
        require("rendering.api_token", &self.rendering.api_token)?;
        require("rendering.account_id", &self.rendering.account_id)?;
        url::Url::parse(&self.rendering.base_url).map_err(|e| SettingsError::Invalid {
            field: "rendering.base_url",
            reason: e.to_string(),
        })?;

        match self.storage.storage_type.as_str() {
            "s3" => {
                require_opt("storage.bucket", &self.storage.bucket)?;
                require_opt("storage.endpoint", &self.storage.endpoint)?;
                require_opt("storage.access_key", &self.storage.access_key)?;
                require_opt("storage.secret_key", &self.storage.secret_key)?;
            }
            "local" => {}
            other => {
                return Err(SettingsError::Invalid {
                    field: "storage.storage_type",
                    reason: format!("unsupported storage type: {}", other),
                })
            }
        }

        if self.metrics.enabled {
            self.metrics
                .listen_addr
                .parse::<std::net::SocketAddr>()
                .map_err(|e| SettingsError::Invalid {
                    field: "metrics.listen_addr",
                    reason: e.to_string(),
                })?;
        }

        Ok(())
    }
}

fn legacy_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn require(field: &'static str, value: &str) -> Result<(), SettingsError> {
    if value.trim().is_empty() {
        return Err(SettingsError::Missing(field));
    }
    Ok(())
}

fn require_opt(field: &'static str, value: &Option<String>) -> Result<(), SettingsError> {
    require(field, value.as_deref().unwrap_or(""))
}
