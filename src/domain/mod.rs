// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含作用域过滤的核心逻辑，包括：
/// - 领域模型（models）：作业、请求和诊断记录
/// - 服务（services）：匹配器、作业作用域和作用域过滤器
pub mod models;
pub mod services;
