// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    body::Body,
    extract::{Extension, Multipart},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::application::dto::render_form::{
    first_messages, RenderFormDto, FIELD_OPTIONS, FIELD_PROMPT, FIELD_URL,
};
use crate::application::usecases::dispatch_render::RenderDispatcher;
use crate::domain::models::render_result::RenderOutcome;
use crate::presentation::errors::{AppError, FormError};

/// 携带存储键的响应头
pub const R2_KEY_HEADER: &str = "x-r2-key";

/// `POST /api/render`
///
/// 读取 multipart 表单，分发到对应的渲染操作。截图与 PDF 直接返回原始字节，
/// 其余选项返回 JSON 信封。
pub async fn render(
    Extension(dispatcher): Extension<Arc<RenderDispatcher>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_form(multipart).await?;

    if let Err(errors) = form.validate_for_dispatch() {
        let (field, message) = first_messages(&errors)
            .into_iter()
            .next()
            .unwrap_or_else(|| (FIELD_URL.to_string(), "invalid".to_string()));
        return Err(FormError::Invalid { field, message }.into());
    }

    let request = form.into_request().map_err(|e| FormError::Invalid {
        field: FIELD_URL.to_string(),
        message: e.to_string(),
    })?;

    let outcome = dispatcher.dispatch(&request).await?;
    into_response(outcome)
}

async fn read_form(mut multipart: Multipart) -> Result<RenderFormDto, FormError> {
    let mut form = RenderFormDto::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FormError::Multipart(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if ![FIELD_OPTIONS, FIELD_URL, FIELD_PROMPT].contains(&name.as_str()) {
            debug!("ignoring unexpected form field {:?}", name);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| FormError::Multipart(e.body_text()))?;

        match name.as_str() {
            FIELD_OPTIONS => form.options = value,
            FIELD_URL => form.url = value,
            _ => form.prompt = Some(value),
        }
    }

    Ok(form)
}

fn into_response(outcome: RenderOutcome) -> Result<Response, AppError> {
    match outcome {
        RenderOutcome::Binary(artifact) => {
            let mut response = (
                StatusCode::OK,
                [(header::CONTENT_TYPE, artifact.content_type)],
                Body::from(artifact.bytes),
            )
                .into_response();

            if let Some(key) = artifact.storage_key {
                response
                    .headers_mut()
                    .insert(R2_KEY_HEADER, HeaderValue::from_str(&key)?);
            }

            Ok(response)
        }
        RenderOutcome::Json(envelope) => Ok((StatusCode::OK, Json(envelope)).into_response()),
    }
}
