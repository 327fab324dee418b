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

use rendrs::application::usecases::dispatch_render::RenderDispatcher;
use rendrs::config::settings::Settings;
use rendrs::infrastructure::metrics;
use rendrs::infrastructure::rendering::cloudflare::CloudflareRenderingClient;
use rendrs::infrastructure::storage::create_storage_repository;
use rendrs::presentation::routes;
use rendrs::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting rendrs...");

    // 2. Load and validate configuration
    let settings = Settings::new()?;
    settings.validate()?;
    info!("Configuration loaded");

    // 3. Initialize Prometheus Metrics
    metrics::init_metrics(&settings.metrics)?;

    // 4. Initialize collaborators
    let renderer = Arc::new(CloudflareRenderingClient::from_settings(&settings.rendering));
    let storage = create_storage_repository(&settings.storage)?;
    info!(
        "Using {} storage with rendering API at {}",
        settings.storage.storage_type, settings.rendering.base_url
    );

    let dispatcher = Arc::new(RenderDispatcher::new(renderer, storage));

    // 5. Start HTTP server
    let app = routes::routes(dispatcher);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
