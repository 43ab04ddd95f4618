use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query string of `GET /upload-url`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadUrlQuery {
    #[serde(default)]
    pub ext: Option<String>,
}

/// A one-time, short-lived, size-capped permission to POST one object
/// directly to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAuthorization {
    /// Target of the multipart POST.
    pub url: String,
    /// Form fields to send before the `file` part. Includes `key` and the
    /// policy-signature fields.
    pub fields: BTreeMap<String, String>,
    /// Object key the upload will be stored under.
    pub key: String,
    pub expires_at: DateTime<Utc>,
    pub max_bytes: u64,
}

/// Wire shape of `GET /upload-url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadUrlResponse {
    pub url: String,
    pub fields: BTreeMap<String, String>,
}

impl From<UploadAuthorization> for UploadUrlResponse {
    fn from(auth: UploadAuthorization) -> Self {
        Self {
            url: auth.url,
            fields: auth.fields,
        }
    }
}

impl UploadUrlResponse {
    /// The object key embedded in the form fields.
    pub fn key(&self) -> Option<&str> {
        self.fields.get("key").map(String::as_str)
    }
}
