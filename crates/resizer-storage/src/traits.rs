//! Storage abstraction traits
//!
//! The resize service only ever does two things with object storage: it hands
//! out upload authorizations and it reads an uploaded object back by key.

use async_trait::async_trait;
use bytes::Bytes;
use resizer_core::UploadAuthorization;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Reads a previously uploaded object.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Fetch the full contents of `key`.
    ///
    /// Unknown keys yield [`StorageError::NotFound`]; nothing is cached.
    async fn fetch_by_key(&self, key: &str) -> StorageResult<Bytes>;
}

/// Issues one-time, short-lived upload authorizations.
#[async_trait]
pub trait UploadUrlIssuer: Send + Sync {
    /// Derive a fresh object key and sign a POST policy for it.
    ///
    /// `extension` is appended to the key only when it is a short
    /// alphanumeric token; anything else is dropped. Nothing is written.
    async fn issue_upload_url(&self, extension: Option<&str>)
        -> StorageResult<UploadAuthorization>;
}
