// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 渲染选项（render_option）：八种渲染方式的封闭集合
/// - 渲染请求（render_request）：一次表单提交的内容
/// - 渲染结果（render_result）：二进制产物或 JSON 信封
/// - 存储键（storage_key）：产物写入对象存储时的键
pub mod render_option;
pub mod render_request;
pub mod render_result;
pub mod storage_key;
