// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 请求编排模块
///
/// 渲染接口的客户端：表单校验、multipart 提交、响应解释与预览
/// - 表单（form）：字段级校验
/// - 客户端（client）：提交并按选项解释响应
/// - 本地二进制（blob）：截图与 PDF 的本地引用
/// - 预览（preview）：由选项和响应决定的预览内容
/// - 状态（state）：空闲 / 提交中 / 已落定
/// - 会话（session）：把以上串成一次提交
pub mod blob;
pub mod client;
pub mod form;
pub mod preview;
pub mod session;
pub mod state;
