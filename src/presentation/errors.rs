// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// 表单错误
///
/// 请求体无法读取或必填字段缺失
#[derive(Error, Debug)]
pub enum FormError {
    #[error("invalid multipart body: {0}")]
    Multipart(String),
    #[error("{field}: {message}")]
    Invalid { field: String, message: String },
}

/// 应用错误类型
///
/// 封装所有可能的应用层错误。表单错误返回 400，
/// 其余（渲染服务、对象存储失败）统一返回 500，不区分上游原因
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = match self.0.downcast_ref::<FormError>() {
            Some(_) => StatusCode::BAD_REQUEST,
            None => {
                error!("request failed: {:#}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
