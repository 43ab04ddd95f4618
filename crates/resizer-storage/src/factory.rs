use crate::presign::PostPolicyIssuer;
use crate::s3::S3Fetcher;
use crate::traits::{ObjectFetcher, StorageError, StorageResult, UploadUrlIssuer};
use async_trait::async_trait;
use bytes::Bytes;
use resizer_core::{StorageConfig, UploadAuthorization};
use std::sync::Arc;

/// The two storage capabilities the service consumes.
#[derive(Clone)]
pub struct StorageBackends {
    pub fetcher: Arc<dyn ObjectFetcher>,
    pub issuer: Arc<dyn UploadUrlIssuer>,
}

/// Create the storage backends from configuration.
///
/// Incomplete settings do not fail here: the returned backends report the
/// missing variables on every call instead, so the direct resize path keeps
/// working without storage.
pub fn create_storage(config: &StorageConfig) -> StorageResult<StorageBackends> {
    if !config.is_complete() {
        let missing = config.missing_settings();
        tracing::warn!(
            missing = ?missing,
            "Object storage is not configured; staged uploads will fail"
        );
        let unconfigured = Arc::new(UnconfiguredStorage {
            missing: missing.join(", "),
        });
        return Ok(StorageBackends {
            fetcher: unconfigured.clone(),
            issuer: unconfigured,
        });
    }

    let fetcher = S3Fetcher::new(config)?;
    let issuer = PostPolicyIssuer::from_config(config)?;

    tracing::info!(
        bucket = config.bucket.as_deref().unwrap_or_default(),
        region = %config.region,
        endpoint = config.endpoint.as_deref().unwrap_or("aws"),
        "Object storage configured"
    );

    Ok(StorageBackends {
        fetcher: Arc::new(fetcher),
        issuer: Arc::new(issuer),
    })
}

/// Stand-in used when storage settings are missing.
#[derive(Debug)]
struct UnconfiguredStorage {
    missing: String,
}

impl UnconfiguredStorage {
    fn error(&self) -> StorageError {
        StorageError::ConfigError(format!("{} not configured", self.missing))
    }
}

#[async_trait]
impl ObjectFetcher for UnconfiguredStorage {
    async fn fetch_by_key(&self, _key: &str) -> StorageResult<Bytes> {
        Err(self.error())
    }
}

#[async_trait]
impl UploadUrlIssuer for UnconfiguredStorage {
    async fn issue_upload_url(
        &self,
        _extension: Option<&str>,
    ) -> StorageResult<UploadAuthorization> {
        Err(self.error())
    }
}
