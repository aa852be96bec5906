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

use crate::domain::models::offsite::OffsiteRecord;
use crate::domain::services::diagnostics::DiagnosticsSink;
use crate::infrastructure::diagnostics::{ChannelDiagnostics, NoopDiagnostics, TracingDiagnostics};
use crate::utils::telemetry::DEFAULT_LOG_FILTER;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// 应用程序配置设置
///
/// 包含日志、诊断输出和作用域默认值等配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 日志配置
    pub telemetry: TelemetrySettings,
    /// 诊断输出配置
    pub diagnostics: DiagnosticsSettings,
    /// 作用域配置
    #[serde(default)]
    pub scope: ScopeSettings,
}

/// 日志配置设置
#[derive(Debug, Deserialize)]
pub struct TelemetrySettings {
    /// `RUST_LOG` 未设置时使用的过滤规则
    pub log_filter: String,
}

/// 诊断接收器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// 写入日志
    Tracing,
    /// 送入有界通道
    Channel,
    /// 丢弃
    None,
}

/// 诊断输出配置设置
#[derive(Debug, Deserialize)]
pub struct DiagnosticsSettings {
    /// 接收器类型
    pub sink: SinkKind,
    /// 通道容量 (当 sink=channel 时使用)
    pub channel_capacity: usize,
}

/// 作用域配置设置
#[derive(Debug, Default, Deserialize)]
pub struct ScopeSettings {
    /// 作业未声明允许域名时使用的默认列表
    #[serde(default)]
    pub default_allowed_domains: Vec<String>,
}

impl DiagnosticsSettings {
    /// 根据配置构建诊断接收器
    ///
    /// # 返回值
    ///
    /// 返回接收器；类型为 channel 时同时返回记录接收端
    pub fn build_sink(
        &self,
    ) -> (
        Arc<dyn DiagnosticsSink>,
        Option<mpsc::Receiver<OffsiteRecord>>,
    ) {
        match self.sink {
            SinkKind::Tracing => (Arc::new(TracingDiagnostics), None),
            SinkKind::Channel => {
                let (sink, receiver) = ChannelDiagnostics::new(self.channel_capacity);
                (Arc::new(sink), Some(receiver))
            }
            SinkKind::None => (Arc::new(NoopDiagnostics), None),
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `CRAWL_SCOPE` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("CRAWL_SCOPE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scope.default_allowed_domains")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 从指定配置文件加载，缺省项使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("telemetry.log_filter", DEFAULT_LOG_FILTER)?
            .set_default("diagnostics.sink", "tracing")?
            .set_default("diagnostics.channel_capacity", 1024)
    }
}
