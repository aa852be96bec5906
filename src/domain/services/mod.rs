// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含作用域过滤的核心逻辑：
/// - 主机名匹配器（host_matcher）：由允许域名编译的匹配器和作用域策略
/// - 诊断接口（diagnostics）：站外请求诊断记录的接收接口
/// - 作业作用域（job_scope）：单个作业的匹配器和已报告主机名
/// - 作用域过滤器（scope_filter）：多作业注册表和批量过滤
pub mod diagnostics;
pub mod host_matcher;
pub mod job_scope;
pub mod scope_filter;
