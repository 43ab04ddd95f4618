//! Presigned POST issuance (AWS Signature Version 4 POST policy).
//!
//! The client uploads straight to the bucket with a multipart form made of the
//! returned fields followed by a `file` part. The policy pins the bucket and
//! key, caps the body with `content-length-range` and expires after
//! [`UPLOAD_URL_EXPIRY_SECS`].

use crate::keys::generate_object_key;
use crate::traits::{StorageError, StorageResult, UploadUrlIssuer};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use resizer_core::constants::{MAX_STAGED_UPLOAD_BYTES, UPLOAD_URL_EXPIRY_SECS};
use resizer_core::{StorageConfig, UploadAuthorization};
use serde_json::json;
use sha2::Sha256;
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";

/// Signs S3 POST policies with static credentials. Pure computation; no
/// request is made to the storage service.
#[derive(Clone)]
pub struct PostPolicyIssuer {
    bucket: String,
    region: String,
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    endpoint: Option<String>,
    expires_in: Duration,
    max_bytes: u64,
}

impl std::fmt::Debug for PostPolicyIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostPolicyIssuer")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PostPolicyIssuer {
    /// Build an issuer from storage settings.
    ///
    /// Fails with [`StorageError::ConfigError`] naming the missing variables.
    pub fn from_config(config: &StorageConfig) -> StorageResult<Self> {
        let missing = config.missing_settings();
        let (Some(bucket), Some(access_key_id), Some(secret_access_key)) = (
            config.bucket.clone(),
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
        ) else {
            return Err(StorageError::ConfigError(format!(
                "{} not configured",
                missing.join(", ")
            )));
        };

        if config.region.is_empty() {
            return Err(StorageError::ConfigError(
                "S3_REGION or AWS_REGION not configured".to_string(),
            ));
        }

        Ok(Self {
            bucket,
            region: config.region.clone(),
            access_key_id,
            secret_access_key,
            session_token: config.session_token.clone(),
            endpoint: config.endpoint.clone(),
            expires_in: Duration::seconds(UPLOAD_URL_EXPIRY_SECS as i64),
            max_bytes: MAX_STAGED_UPLOAD_BYTES,
        })
    }

    /// Form target: virtual-hosted AWS URL, or path-style on a custom endpoint.
    pub fn upload_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            None => format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region),
        }
    }

    /// Issue an authorization as of `now`.
    pub fn issue_at(
        &self,
        extension: Option<&str>,
        now: DateTime<Utc>,
    ) -> StorageResult<UploadAuthorization> {
        let key = generate_object_key(now, extension);
        let expires_at = now + self.expires_in;

        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let credential = format!(
            "{}/{}/{}/{}/aws4_request",
            self.access_key_id, date_stamp, self.region, SERVICE
        );

        let mut conditions = vec![
            json!({ "bucket": self.bucket }),
            json!({ "key": key }),
            json!(["content-length-range", 0, self.max_bytes]),
            json!({ "x-amz-algorithm": ALGORITHM }),
            json!({ "x-amz-credential": credential }),
            json!({ "x-amz-date": amz_date }),
        ];
        if let Some(token) = &self.session_token {
            conditions.push(json!({ "x-amz-security-token": token }));
        }

        let policy = json!({
            "expiration": expires_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            "conditions": conditions,
        });
        let encoded_policy = STANDARD.encode(policy.to_string());

        let signing_key =
            derive_signing_key(&self.secret_access_key, &date_stamp, &self.region, SERVICE)?;
        let signature = hex::encode(hmac_sha256(&signing_key, encoded_policy.as_bytes())?);

        let mut fields = BTreeMap::new();
        fields.insert("key".to_string(), key.clone());
        fields.insert("policy".to_string(), encoded_policy);
        fields.insert("x-amz-algorithm".to_string(), ALGORITHM.to_string());
        fields.insert("x-amz-credential".to_string(), credential);
        fields.insert("x-amz-date".to_string(), amz_date);
        fields.insert("x-amz-signature".to_string(), signature);
        if let Some(token) = &self.session_token {
            fields.insert("x-amz-security-token".to_string(), token.clone());
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            expires_at = %expires_at,
            max_bytes = self.max_bytes,
            "Upload authorization issued"
        );

        Ok(UploadAuthorization {
            url: self.upload_url(),
            fields,
            key,
            expires_at,
            max_bytes: self.max_bytes,
        })
    }
}

#[async_trait]
impl UploadUrlIssuer for PostPolicyIssuer {
    async fn issue_upload_url(
        &self,
        extension: Option<&str>,
    ) -> StorageResult<UploadAuthorization> {
        self.issue_at(extension, Utc::now())
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> StorageResult<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| StorageError::SigningFailed(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// SigV4 signing key: HMAC chain over date, region, service and terminator.
pub fn derive_signing_key(
    secret_access_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> StorageResult<Vec<u8>> {
    let k_date = hmac_sha256(
        format!("AWS4{}", secret_access_key).as_bytes(),
        date_stamp.as_bytes(),
    )?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}
