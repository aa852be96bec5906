// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::offsite::OffsiteRecord;

/// 诊断记录接收器
///
/// 接收站外请求的诊断记录。实现必须是非阻塞的，接收失败只能在内部处理，
/// 不得影响请求的放行或过滤结果。
pub trait DiagnosticsSink: Send + Sync {
    /// 记录一条站外请求诊断
    fn record(&self, record: OffsiteRecord);
}
