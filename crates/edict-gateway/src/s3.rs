//! S3 object storage

use crate::error::StorageError;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use edict_domain::traits::ObjectStore;
use tracing::{debug, info, warn};

/// Notice documents stored in one S3 bucket
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a store for `bucket`
    ///
    /// Path-style addressing is used when the config carries an endpoint
    /// override, since emulators rarely serve virtual-hosted buckets.
    pub fn new(sdk_config: &SdkConfig, bucket: impl Into<String>) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);
        if sdk_config.endpoint_url().is_some() {
            builder = builder.force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: bucket.into(),
        }
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    type Error = StorageError;

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        debug!(bucket = %self.bucket, key = %key, "Downloading object");

        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    warn!(bucket = %self.bucket, key = %key, "Object not found");
                    return Ok(None);
                }
                return Err(StorageError::Request {
                    key: key.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                });
            }
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Body {
                key: key.to_string(),
                message: e.to_string(),
            })?
            .into_bytes();

        info!(bucket = %self.bucket, key = %key, "Downloaded {} bytes", bytes.len());
        Ok(Some(bytes.to_vec()))
    }
}
