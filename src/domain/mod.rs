// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务概念，包括：
/// - 领域模型（models）：渲染选项、请求、结果与存储键
/// - 仓库接口（repositories）：对象存储抽象接口
/// - 服务（services）：浏览器渲染服务抽象接口
///
/// 领域层不依赖于任何外部实现。
pub mod models;
pub mod repositories;
pub mod services;
