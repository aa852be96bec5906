// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供诊断接收器实现和可观测性支持
pub mod diagnostics;
pub mod observability;
