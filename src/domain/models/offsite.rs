// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::request::FollowRequest;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 站外请求诊断记录
///
/// 某个作业第一次遇到某个站外主机名时产生，每个（作业，主机名）最多一条
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsiteRecord {
    /// 作业ID
    pub job_id: Uuid,
    /// 被过滤的主机名
    pub hostname: String,
    /// 触发记录的请求
    pub request: FollowRequest,
    /// 过滤时间
    pub filtered_at: DateTime<Utc>,
}

impl OffsiteRecord {
    /// 创建新的诊断记录
    pub fn new(job_id: Uuid, hostname: impl Into<String>, request: FollowRequest) -> Self {
        Self {
            job_id,
            hostname: hostname.into(),
            request,
            filtered_at: Utc::now(),
        }
    }
}
