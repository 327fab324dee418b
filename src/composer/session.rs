// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing::warn;

use super::blob::BlobStore;
use super::client::{ComposerClient, ComposerError, RenderResponse};
use super::form::{FormErrors, RenderForm, ValidatedForm};
use super::preview::{Preview, SettledResponse};
use super::state::{ComposerState, Notification};

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 校验未通过，未发出请求
    Invalid(FormErrors),
    /// 请求失败，状态已回到空闲
    Failed(Notification),
    /// 收到响应
    Previewed(Preview),
}

/// 请求编排器
///
/// 串起校验、提交、本地保存二进制结果与预览
pub struct Composer {
    client: ComposerClient,
    blobs: BlobStore,
    state: ComposerState,
}

impl Composer {
    pub fn new(client: ComposerClient, blobs: BlobStore) -> Self {
        Self {
            client,
            blobs,
            state: ComposerState::default(),
        }
    }

    pub fn state(&self) -> &ComposerState {
        &self.state
    }

    pub async fn submit(&mut self, form: &RenderForm) -> SubmitOutcome {
        let validated = match form.validate() {
            Ok(validated) => validated,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };

        // `&mut self` rules out a second submission while this one is in flight.
        self.state.begin();

        match self.fetch(&validated).await {
            Ok(settled) => {
                let preview = Preview::from_response(validated.option, &validated.url, &settled);
                self.state.settle(Some(settled));
                SubmitOutcome::Previewed(preview)
            }
            Err(e) => {
                warn!("render submission failed: {}", e);
                SubmitOutcome::Failed(self.state.fail(e))
            }
        }
    }

    async fn fetch(&self, form: &ValidatedForm) -> Result<SettledResponse, ComposerError> {
        match self.client.submit(form).await? {
            RenderResponse::Blob {
                bytes,
                content_type,
                r2_key,
            } => {
                let blob = self.blobs.store(&bytes, &content_type).await?;
                Ok(SettledResponse::Blob { blob, r2_key })
            }
            RenderResponse::Json(value) => Ok(SettledResponse::Json(value)),
        }
    }
}
