//! Object key generation and validation.
//!
//! Key format: `<YYYY-MM-DD>/<sha256 hex of a UUIDv4>[.<ext>]`, dated in UTC.
//! Keys never contain user-supplied names; the only user input that reaches
//! a key is a sanitized extension.

use crate::traits::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 16;

/// Accept `ext` only if it is 1-16 ASCII alphanumerics.
pub fn sanitize_extension(ext: Option<&str>) -> Option<&str> {
    ext.filter(|e| {
        !e.is_empty()
            && e.len() <= MAX_EXTENSION_LEN
            && e.bytes().all(|b| b.is_ascii_alphanumeric())
    })
}

/// Generate a new object key for an upload issued at `now`.
pub fn generate_object_key(now: DateTime<Utc>, extension: Option<&str>) -> String {
    let digest = hex::encode(Sha256::digest(Uuid::new_v4().to_string().as_bytes()));
    let date = now.format("%Y-%m-%d");

    match sanitize_extension(extension) {
        Some(ext) => format!("{}/{}.{}", date, digest, ext),
        None => format!("{}/{}", date, digest),
    }
}

/// Reject keys that are empty, absolute, or contain a `..` segment.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey("key is empty".to_string()));
    }
    if key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "key must not start with '/'".to_string(),
        ));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(
            "key must not contain '..'".to_string(),
        ));
    }
    Ok(())
}
