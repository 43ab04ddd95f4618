use crate::keys::validate_key;
use crate::traits::{ObjectFetcher, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStore, ObjectStoreExt};
use resizer_core::StorageConfig;
use std::sync::Arc;

/// Reads uploaded objects from an S3 bucket (or any `ObjectStore`).
#[derive(Clone)]
pub struct S3Fetcher {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl S3Fetcher {
    /// Build an S3-backed fetcher from explicit settings.
    ///
    /// `endpoint` switches to an S3-compatible provider (e.g.
    /// "http://localhost:9000" for MinIO) using path-style requests.
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let bucket = config
            .bucket
            .clone()
            .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;

        let mut builder = AmazonS3Builder::new()
            .with_region(config.region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref key_id) = config.access_key_id {
            builder = builder.with_access_key_id(key_id.clone());
        }
        if let Some(ref secret) = config.secret_access_key {
            builder = builder.with_secret_access_key(secret.clone());
        }
        if let Some(ref token) = config.session_token {
            builder = builder.with_token(token.clone());
        }
        if let Some(ref endpoint) = config.endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::with_store(Arc::new(store), bucket))
    }

    /// Wrap an existing store, e.g. `object_store::memory::InMemory` in tests.
    pub fn with_store(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectFetcher for S3Fetcher {
    async fn fetch_by_key(&self, key: &str) -> StorageResult<Bytes> {
        validate_key(key)?;

        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result = self.store.get(&location).await.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => {
                tracing::debug!(bucket = %self.bucket, key = %key, "S3 object not found");
                StorageError::NotFound(key.to_string())
            }
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result.bytes().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                "S3 download body read failed"
            );
            StorageError::DownloadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes)
    }
}
