// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::settings::StorageSettings;
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};

/// S3 分片大小，除最后一片外每片不得小于 5 MiB
pub const MULTIPART_CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// S3 兼容对象存储实现（Cloudflare R2）
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(
        region: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        endpoint: Option<String>,
    ) -> Self {
        let credentials =
            aws_sdk_s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let mut config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region))
            .credentials_provider(credentials);

        if let Some(ep) = endpoint {
            config_builder = config_builder.endpoint_url(ep).force_path_style(true);
        }

        let config = config_builder.build();
        let client = aws_sdk_s3::Client::from_conf(config);

        Self { client, bucket }
    }

    async fn upload_parts(
        &self,
        key: &str,
        upload_id: &str,
        data: &Bytes,
    ) -> Result<Vec<CompletedPart>, StorageError> {
        let mut parts = Vec::new();
        // An empty body still needs one part to complete the upload.
        let chunks: Vec<Bytes> = if data.is_empty() {
            vec![Bytes::new()]
        } else {
            data.chunks(MULTIPART_CHUNK_SIZE)
                .map(|chunk| data.slice_ref(chunk))
                .collect()
        };

        for (index, chunk) in chunks.into_iter().enumerate() {
            let part_number = (index + 1) as i32;
            let output = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(chunk))
                .send()
                .await
                .map_err(|e| StorageError::Service(e.into_service_error().to_string()))?;

            parts.push(
                CompletedPart::builder()
                    .set_e_tag(output.e_tag().map(str::to_string))
                    .part_number(part_number)
                    .build(),
            );
        }

        Ok(parts)
    }
}

#[async_trait]
impl StorageRepository for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::Service(e.into_service_error().to_string()))?;
        Ok(())
    }

    async fn upload_multipart(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Service(e.into_service_error().to_string()))?;

        let upload_id = created
            .upload_id()
            .ok_or_else(|| StorageError::Other("multipart upload returned no upload id".into()))?
            .to_string();

        let parts = match self.upload_parts(key, &upload_id, &data).await {
            Ok(parts) => parts,
            Err(e) => {
                if let Err(abort_err) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    warn!("Failed to abort multipart upload {}: {}", upload_id, abort_err);
                }
                return Err(e);
            }
        };

        debug!("Completing multipart upload of {} in {} parts", key, parts.len());

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(&upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| StorageError::Service(e.into_service_error().to_string()))?;

        Ok(())
    }
}

/// 本地文件系统存储实现
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn get_full_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.get_full_path(key);

        // 确保目录存在
        if let Some(parent) = Path::new(&full_path).parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&full_path).await?;
        file.write_all(data).await?;
        file.flush().await?;

        Ok(())
    }
}

#[async_trait]
impl StorageRepository for LocalStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        self.write(key, &data).await
    }

    async fn upload_multipart(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        self.write(key, &data).await
    }
}

/// 存储工厂函数
pub fn create_storage_repository(
    settings: &StorageSettings,
) -> Result<Arc<dyn StorageRepository>, StorageError> {
    match settings.storage_type.as_str() {
        "s3" => {
            let required = |name: &str, value: &Option<String>| {
                value
                    .clone()
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| StorageError::Other(format!("missing storage.{}", name)))
            };
            Ok(Arc::new(S3Storage::new(
                settings.region.clone(),
                required("bucket", &settings.bucket)?,
                required("access_key", &settings.access_key)?,
                required("secret_key", &settings.secret_key)?,
                settings.endpoint.clone(),
            )))
        }
        "local" => {
            let base_path = settings
                .local_path
                .clone()
                .unwrap_or_else(|| "./storage".to_string());
            Ok(Arc::new(LocalStorage::new(base_path)))
        }
        other => Err(StorageError::Other(format!(
            "Unsupported storage type: {}",
            other
        ))),
    }
}

/// 上传方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Put,
    Multipart,
}

/// 内存中保存的对象
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
    pub mode: UploadMode,
}

/// 测试用的内存存储实现（用于单元测试）
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    objects: Arc<RwLock<std::collections::HashMap<String, StoredObject>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    async fn insert(&self, key: &str, data: Bytes, content_type: &str, mode: UploadMode) {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                mode,
            },
        );
    }
}

#[async_trait]
impl StorageRepository for InMemoryStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.insert(key, data, content_type, UploadMode::Put).await;
        Ok(())
    }

    async fn upload_multipart(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.insert(key, data, content_type, UploadMode::Multipart)
            .await;
        Ok(())
    }
}
