// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::CrawlJob;
use crate::domain::models::offsite::OffsiteRecord;
use crate::domain::models::request::{FollowRequest, SpiderOutput};
use crate::domain::services::diagnostics::DiagnosticsSink;
use crate::domain::services::host_matcher::{HostMatcher, ScopePolicy, SuffixPolicy};
use crate::utils::errors::ScopeError;
use metrics::counter;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// 作业作用域
///
/// 单个作业的作用域状态：作业开始时编译的匹配器，以及已报告过的站外主机名集合。
/// 在作业开始时创建，作业结束时丢弃。
#[derive(Debug)]
pub struct JobScope {
    /// 作业ID
    job_id: Uuid,
    /// 主机名匹配器
    matcher: HostMatcher,
    /// 已报告的站外主机名，只增不减
    seen_domains: Mutex<HashSet<String>>,
}

impl JobScope {
    /// 使用默认后缀策略创建作业作用域
    pub fn new(job: &CrawlJob) -> Result<Self, ScopeError> {
        Self::with_policy(job, &SuffixPolicy)
    }

    /// 使用指定策略创建作业作用域
    ///
    /// # 参数
    ///
    /// * `job` - 爬取作业
    /// * `policy` - 作用域策略
    ///
    /// # 返回值
    ///
    /// * `Ok(JobScope)` - 新的作业作用域
    /// * `Err(ScopeError)` - 匹配器构建失败
    pub fn with_policy(job: &CrawlJob, policy: &dyn ScopePolicy) -> Result<Self, ScopeError> {
        let matcher = policy.matcher(job)?;
        debug!(
            job_id = %job.id,
            pattern = matcher.as_str(),
            "Compiled host matcher for job {}",
            job.name
        );

        Ok(Self {
            job_id: job.id,
            matcher,
            seen_domains: Mutex::new(HashSet::new()),
        })
    }

    /// 作业ID
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// 作业的主机名匹配器
    pub fn matcher(&self) -> &HostMatcher {
        &self.matcher
    }

    /// 请求的主机名是否在作用域内（不考虑跳过标志）
    pub fn should_follow(&self, request: &FollowRequest) -> bool {
        self.matcher.is_match(request.hostname())
    }

    /// 已报告的站外主机名快照，按字母排序
    pub fn seen_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.seen_domains.lock().iter().cloned().collect();
        domains.sort();
        domains
    }

    /// 判断单个输出项是否放行
    ///
    /// 非请求项和跳过作用域检查的请求总是放行。被过滤的请求如果指向一个
    /// 首次出现的非空主机名，会向诊断接收器发送一条记录。
    pub fn admit<I>(&self, output: &SpiderOutput<I>, diagnostics: &dyn DiagnosticsSink) -> bool {
        let request = match output {
            SpiderOutput::Request(request) => request,
            SpiderOutput::Item(_) => return true,
        };

        if request.bypass_scope || self.should_follow(request) {
            counter!("scope_filter_admitted_total").increment(1);
            return true;
        }

        counter!("scope_filter_filtered_total").increment(1);

        let hostname = request.hostname();
        if !hostname.is_empty() && self.mark_seen(hostname) {
            counter!("scope_filter_offsite_domains_total").increment(1);
            diagnostics.record(OffsiteRecord::new(self.job_id, hostname, request.clone()));
        }

        false
    }

    /// 惰性过滤一批输出项，保持放行项的相对顺序
    pub fn filter<'a, I, T>(
        &'a self,
        outputs: T,
        diagnostics: &'a dyn DiagnosticsSink,
    ) -> impl Iterator<Item = SpiderOutput<I>> + 'a
    where
        T: IntoIterator<Item = SpiderOutput<I>>,
        T::IntoIter: 'a,
    {
        outputs
            .into_iter()
            .filter(move |output| self.admit(output, diagnostics))
    }

    /// 记录主机名，首次出现时返回 true
    fn mark_seen(&self, hostname: &str) -> bool {
        let mut seen = self.seen_domains.lock();
        if seen.contains(hostname) {
            return false;
        }
        seen.insert(hostname.to_string())
    }
}
