// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// 本地可寻址的二进制引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub path: PathBuf,
    pub content_type: String,
}

impl BlobRef {
    /// `file://` 形式的地址，无法转换时退回路径文本
    pub fn url(&self) -> String {
        let absolute = std::path::absolute(&self.path).unwrap_or_else(|_| self.path.clone());
        Url::from_file_path(&absolute)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| absolute.display().to_string())
    }
}

/// 二进制结果的本地存放目录
pub struct BlobStore {
    dir: PathBuf,
    counter: AtomicU64,
}

impl BlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 写入字节并返回引用
    pub async fn store(&self, bytes: &[u8], content_type: &str) -> std::io::Result<BlobRef> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let name = format!(
            "blob-{}-{}.{}",
            Utc::now().timestamp_millis(),
            seq,
            extension_for(content_type)
        );
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes).await?;

        Ok(BlobRef {
            path,
            content_type: content_type.to_string(),
        })
    }
}

fn extension_for(content_type: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}
