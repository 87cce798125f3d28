//! S3-backed blob store.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;

use super::{BlobObject, BlobStore, StorageError};

/// [`BlobStore`] over the AWS SDK S3 client
#[derive(Clone, Debug)]
pub struct S3BlobStore {
    client: S3Client,
}

impl S3BlobStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Build a client from the standard AWS provider chain.
    ///
    /// Region and credentials come from the environment / profile. A custom
    /// `endpoint` (LocalStack, MinIO) switches to path-style addressing.
    pub async fn from_env(endpoint: Option<&str>) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint {
            tracing::info!(endpoint = %endpoint, "Using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(S3Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<BlobObject, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                if not_found {
                    StorageError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    StorageError::Backend {
                        operation: "GetObject",
                        message: DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        let content_type = response.content_type().map(str::to_string);

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend {
                operation: "GetObject",
                message: format!("Failed to read S3 body: {e}"),
            })?
            .into_bytes();

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size = body.len(),
            content_type = content_type.as_deref().unwrap_or("<none>"),
            "Fetched object from S3"
        );

        Ok(BlobObject { body, content_type })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::Backend {
                operation: "PutObject",
                message: DisplayErrorContext(&e).to_string(),
            })?;

        tracing::debug!(bucket = %bucket, key = %key, size, "Stored object in S3");

        Ok(())
    }
}
