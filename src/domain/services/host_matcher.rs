// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::CrawlJob;
use crate::utils::errors::ScopeError;
use regex::Regex;

/// 主机名匹配器
///
/// 由作业的允许域名列表编译而来，编译后不可变。
/// 允许列表为空时匹配所有主机名（包括空主机名）；否则主机名必须等于某个
/// 域名后缀，或以 `.` 加该后缀结尾。匹配区分大小写。
#[derive(Debug, Clone)]
pub struct HostMatcher {
    /// 编译后的正则表达式，`None` 表示不限制
    pattern: Option<Regex>,
}

impl HostMatcher {
    /// 创建匹配所有主机名的匹配器
    pub fn allow_all() -> Self {
        Self { pattern: None }
    }

    /// 根据允许的域名后缀列表编译匹配器
    ///
    /// 域名中的特殊字符会被转义，`.` 只匹配字面意义上的点。
    ///
    /// # 参数
    ///
    /// * `allowed_domains` - 允许的域名后缀列表
    ///
    /// # 返回值
    ///
    /// * `Ok(HostMatcher)` - 编译好的匹配器
    /// * `Err(ScopeError)` - 正则表达式编译失败
    pub fn new<S: AsRef<str>>(allowed_domains: &[S]) -> Result<Self, ScopeError> {
        if allowed_domains.is_empty() {
            return Ok(Self::allow_all());
        }

        let alternatives = allowed_domains
            .iter()
            .map(|domain| regex::escape(domain.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"^(.*\.)?({})$", alternatives))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// 判断主机名是否在作用域内
    pub fn is_match(&self, hostname: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(hostname),
            None => true,
        }
    }

    /// 是否匹配所有主机名
    pub fn accepts_all(&self) -> bool {
        self.pattern.is_none()
    }

    /// 匹配器的正则表达式源码，不限制时为空字符串
    pub fn as_str(&self) -> &str {
        self.pattern.as_ref().map(Regex::as_str).unwrap_or("")
    }
}

/// 作用域策略
///
/// 决定如何从作业配置生成主机名匹配器。需要不同站外策略时实现此接口。
pub trait ScopePolicy: Send + Sync {
    /// 为作业构建匹配器
    fn matcher(&self, job: &CrawlJob) -> Result<HostMatcher, ScopeError>;
}

/// 默认策略：按允许域名后缀匹配
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixPolicy;

impl ScopePolicy for SuffixPolicy {
    fn matcher(&self, job: &CrawlJob) -> Result<HostMatcher, ScopeError> {
        HostMatcher::new(&job.allowed_domains)
    }
}
