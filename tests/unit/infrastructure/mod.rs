// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层单元测试
///
/// 测试存储工厂与本地存储实现
pub mod storage_test;
