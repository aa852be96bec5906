// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;
use uuid::Uuid;

/// 作用域过滤错误类型
#[derive(Error, Debug)]
pub enum ScopeError {
    /// 停止了一个没有作用域状态的作业（从未启动或重复停止）
    #[error("作业生命周期错误: 作业 {job_id} 没有可释放的作用域状态")]
    LifecycleMisuse { job_id: Uuid },

    /// 对未启动的作业执行过滤
    #[error("作业未启动: {job_id}")]
    JobNotStarted { job_id: Uuid },

    /// 生命周期事件接收落后，部分事件已丢失
    #[error("作业事件丢失: 接收端落后 {skipped} 条事件")]
    EventsLagged { skipped: u64 },

    /// 域名匹配模式编译失败
    #[error("无效的域名匹配模式: {0}")]
    InvalidPattern(#[from] regex::Error),
}
