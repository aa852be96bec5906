// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::offsite::OffsiteRecord;
use crate::domain::services::diagnostics::DiagnosticsSink;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// 日志诊断接收器
///
/// 以 debug 级别把站外请求写入日志
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn record(&self, record: OffsiteRecord) {
        debug!(
            job_id = %record.job_id,
            domain = %record.hostname,
            request = %record.request,
            "Filtered offsite request to {:?}: {}",
            record.hostname,
            record.request
        );
    }
}

/// 通道诊断接收器
///
/// 把记录非阻塞地送入有界通道，通道已满或已关闭时丢弃记录
#[derive(Debug, Clone)]
pub struct ChannelDiagnostics {
    sender: mpsc::Sender<OffsiteRecord>,
}

impl ChannelDiagnostics {
    /// 创建通道诊断接收器
    ///
    /// # 参数
    ///
    /// * `capacity` - 通道容量，最小为 1
    ///
    /// # 返回值
    ///
    /// 返回接收器和对应的记录接收端
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<OffsiteRecord>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl DiagnosticsSink for ChannelDiagnostics {
    fn record(&self, record: OffsiteRecord) {
        match self.sender.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                warn!(
                    job_id = %record.job_id,
                    domain = %record.hostname,
                    "Diagnostics channel full, dropping offsite record"
                );
            }
            Err(TrySendError::Closed(record)) => {
                warn!(
                    job_id = %record.job_id,
                    domain = %record.hostname,
                    "Diagnostics channel closed, dropping offsite record"
                );
            }
        }
    }
}

/// 丢弃所有记录
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl DiagnosticsSink for NoopDiagnostics {
    fn record(&self, _record: OffsiteRecord) {}
}
