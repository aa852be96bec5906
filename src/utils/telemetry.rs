// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 默认日志过滤规则
pub const DEFAULT_LOG_FILTER: &str = "info,crawl_scope=debug";

/// 初始化日志订阅器
///
/// 优先使用 `RUST_LOG` 环境变量，否则回退到传入的过滤规则。
/// 全局订阅器已存在时静默跳过。
pub fn init_telemetry(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
