// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了作用域过滤涉及的核心数据结构，包括：
/// - 爬取作业（job）：作业标识、允许域名和生命周期事件
/// - 请求（request）：页面中发现的跟随请求和其他输出项
/// - 站外记录（offsite）：被过滤请求的诊断记录
pub mod job;
pub mod offsite;
pub mod request;

pub use job::{CrawlJob, JobEvent};
pub use offsite::OffsiteRecord;
pub use request::{FollowRequest, SpiderOutput};
