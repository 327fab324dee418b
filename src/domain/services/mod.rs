// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 定义外部浏览器渲染服务的抽象接口
pub mod rendering_service;
