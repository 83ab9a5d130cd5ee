use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

/// Validity window of the signed read URL handed to the enrichment calls.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(15 * 60);

/// A stored piece of evidence: sanitized filename, durable storage key,
/// and a read-only signed URL minted fresh at upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedEvidenceRef {
    pub file_name: String,
    pub storage_key: String,
    pub signed_url: String,
}

/// Evidence Store Uploader. Upload is overwrite-at-key, so a retry with the
/// same claim and filename lands on the same object.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    async fn upload(
        &self,
        claim_id: Uuid,
        declared_name: &str,
        body: Bytes,
    ) -> Result<UploadedEvidenceRef>;
}

/// S3-backed evidence store (MinIO-compatible).
pub struct S3EvidenceStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3EvidenceStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl EvidenceStore for S3EvidenceStore {
    async fn upload(
        &self,
        claim_id: Uuid,
        declared_name: &str,
        body: Bytes,
    ) -> Result<UploadedEvidenceRef> {
        let file_name = sanitize_filename(declared_name);
        // Keyed under the claim id so identical filenames across claims never collide.
        let storage_key = storage_key(claim_id, &file_name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&storage_key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| anyhow!("S3 upload failed for {storage_key}: {e}"))?;

        info!("Uploaded evidence to s3://{}/{}", self.bucket, storage_key);

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&storage_key)
            .presigned(PresigningConfig::expires_in(SIGNED_URL_TTL)?)
            .await
            .map_err(|e| anyhow!("Presigning failed for {storage_key}: {e}"))?;

        Ok(UploadedEvidenceRef {
            file_name,
            storage_key,
            signed_url: presigned.uri().to_string(),
        })
    }
}

/// Storage key shape: `{claim_id}/{sanitized_filename}`.
pub fn storage_key(claim_id: Uuid, sanitized_name: &str) -> String {
    format!("{claim_id}/{sanitized_name}")
}

/// Reduces a client-declared filename to a safe storage key component:
/// strips any path, replaces everything outside `[A-Za-z0-9._-]` with `_`,
/// and drops leading dots so traversal names like `..` cannot survive.
pub fn sanitize_filename(declared: &str) -> String {
    let base = declared
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(declared);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
