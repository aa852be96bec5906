// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 爬取作用域过滤
//!
//! 根据作业声明的允许域名，对页面中发现的跟随请求做准入判断，
//! 并对每个作业首次遇到的站外域名发出诊断记录。

/// 配置模块
///
/// 处理日志、诊断输出和默认允许域名等配置
pub mod config;

/// 领域模块
///
/// 包含作业、请求模型和作用域过滤服务
pub mod domain;

/// 基础设施模块
///
/// 提供诊断接收器实现和指标注册
pub mod infrastructure;

/// 工具模块
///
/// 提供错误类型、遥测和URL处理等辅助功能
pub mod utils;

pub use domain::models::{CrawlJob, FollowRequest, JobEvent, OffsiteRecord, SpiderOutput};
pub use domain::services::diagnostics::DiagnosticsSink;
pub use domain::services::host_matcher::{HostMatcher, ScopePolicy, SuffixPolicy};
pub use domain::services::job_scope::JobScope;
pub use domain::services::scope_filter::{ScopeFilter, ScopeFiltered};
pub use utils::errors::ScopeError;
