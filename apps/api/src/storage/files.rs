//! File store: uploads resume documents and preview images to S3.
//!
//! The store is write-only from this service's point of view: uploads return
//! an opaque path that is persisted on the submission record and later handed
//! to the inference service, which reads the object itself.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object upload failed: {0}")]
    Upload(String),
}

/// A document handed to the file store: raw bytes plus naming metadata.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Path reference returned by the file store for an uploaded document.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: String,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(&self, file: &DocumentFile) -> Result<StoredFile, StoreError>;
}

/// S3-backed file store (MinIO locally, AWS in deployment).
pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Object keys are namespaced per upload so identical file names from
    /// different submissions never collide.
    fn object_key(file_name: &str) -> String {
        format!("resumes/{}/{}", Uuid::new_v4(), sanitize_file_name(file_name))
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn upload(&self, file: &DocumentFile) -> Result<StoredFile, StoreError> {
        let key = Self::object_key(&file.file_name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(file.bytes.clone()))
            .content_type(&file.content_type)
            .send()
            .await
            .map_err(|e| StoreError::Upload(format!("S3 upload failed: {e}")))?;

        debug!("uploaded '{}' to s3://{}/{}", file.file_name, self.bucket, key);
        Ok(StoredFile { path: key })
    }
}

/// Reduces a client-supplied file name to a safe object-key segment.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}
