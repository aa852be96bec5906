// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 爬取作业
///
/// 表示一次针对目标站点的爬取运行。作业标识在其生命周期内保持不变，
/// 作用域过滤器只把它当作键来使用，从不修改作业本身。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlJob {
    /// 作业唯一标识符
    pub id: Uuid,
    /// 作业名称，用于日志和诊断
    pub name: String,
    /// 允许的域名后缀列表，为空时不限制域名
    #[serde(default)]
    pub allowed_domains: Vec<String>,
}

impl CrawlJob {
    /// 创建新的爬取作业，自动生成作业ID
    ///
    /// # 参数
    ///
    /// * `name` - 作业名称
    /// * `allowed_domains` - 允许的域名后缀列表
    pub fn new<S: Into<String>>(name: impl Into<String>, allowed_domains: Vec<S>) -> Self {
        Self::with_id(Uuid::new_v4(), name, allowed_domains)
    }

    /// 使用指定ID创建爬取作业
    pub fn with_id<S: Into<String>>(
        id: Uuid,
        name: impl Into<String>,
        allowed_domains: Vec<S>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            allowed_domains: allowed_domains.into_iter().map(Into::into).collect(),
        }
    }

    /// 当作业未声明允许域名时，使用配置中的默认域名列表
    pub fn with_defaults(mut self, default_domains: &[String]) -> Self {
        if self.allowed_domains.is_empty() {
            self.allowed_domains = default_domains.to_vec();
        }
        self
    }
}

impl fmt::Display for CrawlJob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// 作业生命周期事件
///
/// 由宿主的事件总线在作业开始和结束时广播
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// 作业开始产生请求
    Started(CrawlJob),
    /// 作业不再产生请求
    Stopped(CrawlJob),
}

impl JobEvent {
    /// 事件所属的作业
    pub fn job(&self) -> &CrawlJob {
        match self {
            JobEvent::Started(job) | JobEvent::Stopped(job) => job,
        }
    }
}
