// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理作用域过滤器的配置设置，包括日志、诊断输出和默认允许域名
pub mod settings;
