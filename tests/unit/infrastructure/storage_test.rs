// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bytes::Bytes;
use rendrs::config::settings::StorageSettings;
use rendrs::domain::repositories::storage_repository::{StorageError, StorageRepository};
use rendrs::infrastructure::storage::{create_storage_repository, S3Storage, MULTIPART_CHUNK_SIZE};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUCKET: &str = "rendrs";
const KEY: &str = "pdf/example.com/1700000000000.pdf";

fn s3_for(server: &MockServer) -> S3Storage {
    S3Storage::new(
        "auto".to_string(),
        BUCKET.to_string(),
        "access".to_string(),
        "secret".to_string(),
        Some(server.uri()),
    )
}

fn object_path() -> String {
    format!("/{}/{}", BUCKET, KEY)
}

#[tokio::test]
async fn s3_put_object_sends_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/rendrs/markdown/example.com/1.md"))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"abc\""))
        .expect(1)
        .mount(&server)
        .await;

    s3_for(&server)
        .put_object(
            "markdown/example.com/1.md",
            Bytes::from_static(b"# Title"),
            "text/markdown; charset=utf-8",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn s3_multipart_upload_splits_into_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(object_path()))
        .and(query_param("uploads", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<InitiateMultipartUploadResult><Bucket>{}</Bucket><Key>{}</Key><UploadId>u-1</UploadId></InitiateMultipartUploadResult>",
            BUCKET, KEY
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(object_path()))
        .and(query_param("uploadId", "u-1"))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"part\""))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(object_path()))
        .and(query_param("uploadId", "u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<CompleteMultipartUploadResult><Bucket>{}</Bucket><Key>{}</Key><ETag>\"done\"</ETag></CompleteMultipartUploadResult>",
            BUCKET, KEY
        )))
        .expect(1)
        .mount(&server)
        .await;

    let data = Bytes::from(vec![7u8; MULTIPART_CHUNK_SIZE + 1024]);
    s3_for(&server)
        .upload_multipart(KEY, data, "application/pdf")
        .await
        .unwrap();
}

/// 分片失败时中止上传
#[tokio::test]
async fn s3_multipart_aborts_when_a_part_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(object_path()))
        .and(query_param("uploads", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<InitiateMultipartUploadResult><Bucket>{}</Bucket><Key>{}</Key><UploadId>u-2</UploadId></InitiateMultipartUploadResult>",
            BUCKET, KEY
        )))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(object_path()))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(object_path()))
        .and(query_param("uploadId", "u-2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let err = s3_for(&server)
        .upload_multipart(KEY, Bytes::from_static(b"%PDF-1.7"), "application/pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Service(_)));
}

#[tokio::test]
async fn local_storage_from_settings_writes_under_key() {
    let dir = tempfile::tempdir().unwrap();
    let settings = StorageSettings {
        storage_type: "local".to_string(),
        local_path: Some(dir.path().to_string_lossy().into_owned()),
        bucket: None,
        endpoint: None,
        access_key: None,
        secret_key: None,
        region: "auto".to_string(),
    };

    let storage = create_storage_repository(&settings).unwrap();
    storage
        .upload_multipart(KEY, Bytes::from_static(b"%PDF-1.7"), "application/pdf")
        .await
        .unwrap();

    let written = tokio::fs::read(dir.path().join(KEY)).await.unwrap();
    assert_eq!(written, b"%PDF-1.7");
}
