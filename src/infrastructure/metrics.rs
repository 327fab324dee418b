// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

use crate::config::settings::MetricsSettings;
use crate::domain::models::render_option::RenderOption;

pub const RENDER_REQUESTS_TOTAL: &str = "render_requests_total";
pub const RENDER_FAILURES_TOTAL: &str = "render_failures_total";
pub const RENDER_DURATION_SECONDS: &str = "render_duration_seconds";
pub const STORAGE_UPLOADS_TOTAL: &str = "storage_uploads_total";

/// 初始化指标系统
///
/// 未启用时不安装导出器，指标宏调用为空操作
pub fn init_metrics(settings: &MetricsSettings) -> anyhow::Result<()> {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return Ok(());
    }

    let addr: SocketAddr = settings.listen_addr.parse()?;

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return Ok(());
    }

    describe_counter!(RENDER_REQUESTS_TOTAL, "Total number of render requests dispatched");
    describe_counter!(RENDER_FAILURES_TOTAL, "Total number of render requests that failed");
    describe_histogram!(RENDER_DURATION_SECONDS, "Duration of render dispatch in seconds");
    describe_counter!(STORAGE_UPLOADS_TOTAL, "Total number of artifacts written to object storage");

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}

pub fn record_render(option: RenderOption, elapsed: Duration, success: bool) {
    let label = option.as_str();
    counter!(RENDER_REQUESTS_TOTAL, "option" => label).increment(1);
    if !success {
        counter!(RENDER_FAILURES_TOTAL, "option" => label).increment(1);
    }
    histogram!(RENDER_DURATION_SECONDS, "option" => label).record(elapsed.as_secs_f64());
}

pub fn record_upload(category: &'static str) {
    counter!(STORAGE_UPLOADS_TOTAL, "category" => category).increment(1);
}
