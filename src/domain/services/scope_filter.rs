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

use crate::domain::models::job::{CrawlJob, JobEvent};
use crate::domain::models::request::SpiderOutput;
use crate::domain::services::diagnostics::DiagnosticsSink;
use crate::domain::services::host_matcher::{ScopePolicy, SuffixPolicy};
use crate::domain::services::job_scope::JobScope;
use crate::infrastructure::diagnostics::TracingDiagnostics;
use crate::infrastructure::observability::metrics::describe_metrics;
use crate::utils::errors::ScopeError;
use dashmap::DashMap;
use futures::{future, Stream, StreamExt};
use metrics::gauge;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// 作用域过滤器
///
/// 为每个活跃作业维护一个作业作用域，并对页面中发现的跟随请求做准入判断。
/// 作业状态按作业ID分片存储，不同作业之间互不阻塞。
///
/// 同一作业的开始、过滤和停止调用顺序由宿主保证。
#[derive(Clone)]
pub struct ScopeFilter {
    /// 活跃作业的作用域
    scopes: Arc<DashMap<Uuid, Arc<JobScope>>>,
    /// 作用域策略
    policy: Arc<dyn ScopePolicy>,
    /// 诊断记录接收器
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Default for ScopeFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeFilter {
    /// 创建新的作用域过滤器，诊断记录输出到日志
    pub fn new() -> Self {
        Self::with_diagnostics(Arc::new(TracingDiagnostics))
    }

    /// 使用指定诊断接收器创建作用域过滤器
    ///
    /// # 参数
    ///
    /// * `diagnostics` - 诊断记录接收器
    ///
    /// # 返回值
    ///
    /// 返回新的作用域过滤器实例
    pub fn with_diagnostics(diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        describe_metrics();
        Self {
            scopes: Arc::new(DashMap::new()),
            policy: Arc::new(SuffixPolicy),
            diagnostics,
        }
    }

    /// 替换作用域策略，只影响之后启动的作业
    pub fn with_policy(mut self, policy: Arc<dyn ScopePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// 作业开始
    ///
    /// 编译作业的匹配器并创建空的站外主机名集合。对仍在运行的作业重复调用
    /// 会重新初始化其状态。
    ///
    /// # 参数
    ///
    /// * `job` - 开始的作业
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 状态已就绪
    /// * `Err(ScopeError)` - 匹配器构建失败
    pub fn on_job_start(&self, job: &CrawlJob) -> Result<(), ScopeError> {
        let scope = JobScope::with_policy(job, self.policy.as_ref())?;

        if self.scopes.insert(job.id, Arc::new(scope)).is_some() {
            warn!(job_id = %job.id, "Scope state for job {} re-initialized", job.name);
        } else {
            debug!(job_id = %job.id, "Scope state allocated for job {}", job.name);
        }
        self.update_active_gauge();

        Ok(())
    }

    /// 作业结束
    ///
    /// 丢弃作业的匹配器和站外主机名集合。作业没有状态时返回错误，
    /// 这说明宿主的生命周期跟踪存在缺陷。
    pub fn on_job_stop(&self, job: &CrawlJob) -> Result<(), ScopeError> {
        match self.scopes.remove(&job.id) {
            Some((_, scope)) => {
                self.update_active_gauge();
                debug!(
                    job_id = %job.id,
                    offsite_domains = scope.seen_domains().len(),
                    "Scope state released for job {}",
                    job.name
                );
                Ok(())
            }
            None => {
                error!(
                    job_id = %job.id,
                    "Job {} stopped without scope state; start was never called or stop was called twice",
                    job.name
                );
                Err(ScopeError::LifecycleMisuse { job_id: job.id })
            }
        }
    }

    /// 过滤一批输出项
    ///
    /// 返回一个惰性迭代器，按输入顺序产出放行的项。迭代器持有作业作用域的
    /// 引用计数，不占用分片锁。
    ///
    /// # 参数
    ///
    /// * `job` - 已开始的作业
    /// * `outputs` - 一个页面产生的输出项
    ///
    /// # 返回值
    ///
    /// * `Ok(ScopeFiltered)` - 放行项迭代器
    /// * `Err(ScopeError)` - 作业未开始
    pub fn filter<I, T>(
        &self,
        job: &CrawlJob,
        outputs: T,
    ) -> Result<ScopeFiltered<T::IntoIter>, ScopeError>
    where
        T: IntoIterator<Item = SpiderOutput<I>>,
    {
        Ok(ScopeFiltered {
            scope: self.scope_for(job)?,
            diagnostics: Arc::clone(&self.diagnostics),
            inner: outputs.into_iter(),
        })
    }

    /// 过滤一个输出项流，规则与 [`ScopeFilter::filter`] 相同
    pub fn filter_stream<I, S>(
        &self,
        job: &CrawlJob,
        outputs: S,
    ) -> Result<impl Stream<Item = SpiderOutput<I>>, ScopeError>
    where
        S: Stream<Item = SpiderOutput<I>>,
    {
        let scope = self.scope_for(job)?;
        let diagnostics = Arc::clone(&self.diagnostics);

        Ok(outputs.filter(move |output| future::ready(scope.admit(output, diagnostics.as_ref()))))
    }

    /// 处理单个生命周期事件
    pub fn handle_event(&self, event: &JobEvent) -> Result<(), ScopeError> {
        match event {
            JobEvent::Started(job) => self.on_job_start(job),
            JobEvent::Stopped(job) => self.on_job_stop(job),
        }
    }

    /// 监听作业生命周期事件，直到通道关闭
    ///
    /// 遇到生命周期错误时立即返回该错误。接收端落后导致事件丢失时返回
    /// [`ScopeError::EventsLagged`]。通道容量需要覆盖宿主的事件突发量。
    pub async fn listen(&self, mut events: broadcast::Receiver<JobEvent>) -> Result<(), ScopeError> {
        info!("Scope filter listening for job events");
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(&event)?,
                Err(RecvError::Lagged(skipped)) => {
                    error!(skipped, "Job event receiver lagged; lifecycle events were lost");
                    return Err(ScopeError::EventsLagged { skipped });
                }
                Err(RecvError::Closed) => break,
            }
        }
        info!("Job event channel closed");
        Ok(())
    }

    /// 作业是否处于活跃状态
    pub fn is_active(&self, job_id: Uuid) -> bool {
        self.scopes.contains_key(&job_id)
    }

    /// 活跃作业数量
    pub fn active_jobs(&self) -> usize {
        self.scopes.len()
    }

    /// 作业已报告的站外主机名快照
    pub fn seen_domains(&self, job_id: Uuid) -> Option<Vec<String>> {
        self.scopes.get(&job_id).map(|scope| scope.seen_domains())
    }

    /// 获取作业的作用域
    pub fn scope(&self, job_id: Uuid) -> Option<Arc<JobScope>> {
        self.scopes.get(&job_id).map(|scope| Arc::clone(scope.value()))
    }

    fn scope_for(&self, job: &CrawlJob) -> Result<Arc<JobScope>, ScopeError> {
        self.scope(job.id)
            .ok_or(ScopeError::JobNotStarted { job_id: job.id })
    }

    fn update_active_gauge(&self) {
        gauge!("scope_filter_active_jobs").set(self.scopes.len() as f64);
    }
}

/// 作用域过滤迭代器
///
/// 由 [`ScopeFilter::filter`] 返回，逐项判断，不可重启。
pub struct ScopeFiltered<T> {
    scope: Arc<JobScope>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    inner: T,
}

impl<I, T> Iterator for ScopeFiltered<T>
where
    T: Iterator<Item = SpiderOutput<I>>,
{
    type Item = SpiderOutput<I>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let output = self.inner.next()?;
            if self.scope.admit(&output, self.diagnostics.as_ref()) {
                return Some(output);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}
