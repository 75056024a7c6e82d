//! S3 storage provider for hosted deployments.

use async_trait::async_trait;

use crate::provider::{StorageError, StorageProvider};

/// Stores objects in an S3 bucket, served via a public base URL (the
/// bucket website endpoint or a CDN distribution in front of it).
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Build a provider from the ambient AWS environment (credentials
    /// chain, region).
    pub async fn from_env(bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket, public_base_url)
    }

    /// Build a provider against an S3-compatible endpoint (MinIO, Ceph)
    /// with static credentials. Path-style addressing is forced because
    /// those endpoints rarely support virtual-hosted buckets.
    pub fn with_endpoint(
        endpoint_url: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        let credentials =
            aws_credential_types::Credentials::new(access_key, secret_key, None, None, "Static");
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.to_string()))
            .endpoint_url(endpoint_url)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();
        Self::new(aws_sdk_s3::Client::from_conf(config), bucket, public_base_url)
    }

    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageProvider for S3Storage {
    async fn store(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(aws_sdk_s3::primitives::ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(key, bucket = %self.bucket, "Stored object in S3");
        Ok(self.url_for(key))
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e.into_service_error() {
                aws_sdk_s3::operation::get_object::GetObjectError::NoSuchKey(_) => {
                    StorageError::NotFound {
                        key: key.to_string(),
                    }
                }
                other => StorageError::Read {
                    key: key.to_string(),
                    message: other.to_string(),
                },
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Read {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(bytes.into_bytes().to_vec())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    fn key_for<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(&self.public_base_url)
            .map(|rest| rest.trim_start_matches('/'))
    }
}
