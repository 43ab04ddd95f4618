//! Configuration module
//!
//! Server and object-storage settings read from the environment (and `.env`).
//! Storage settings are optional at startup; a missing bucket or credential is
//! reported when the storage is first used.

use std::env;

use crate::constants::DEFAULT_REGION;

const DEFAULT_PORT: u16 = 3000;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_DIRECT_UPLOAD_MB: usize = 10;

/// HTTP server settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub request_timeout_secs: u64,
    /// Body cap for the direct resize endpoint, in bytes.
    pub max_direct_upload_bytes: usize,
    /// `LOG_FORMAT=json` switches the log output to JSON lines.
    pub log_json: bool,
}

/// Object storage settings shared by the upload-url issuer and the fetcher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub bucket: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, R2, ...)
    pub endpoint: Option<String>,
}

impl StorageConfig {
    /// Environment variable names of the settings that are still missing.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.bucket.is_none() {
            missing.push("S3_BUCKET");
        }
        if self.access_key_id.is_none() {
            missing.push("AWS_ACCESS_KEY_ID");
        }
        if self.secret_access_key.is_none() {
            missing.push("AWS_SECRET_ACCESS_KEY");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_settings().is_empty()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |names: &[&str]| -> Option<String> {
            names
                .iter()
                .copied()
                .filter_map(|name| lookup(name))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let environment =
            var(&["ENVIRONMENT", "APP_ENV"]).unwrap_or_else(|| "development".to_string());

        let cors_origins = var(&["CORS_ORIGINS"])
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let port = match var(&["PORT"]) {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let request_timeout_secs = var(&["REQUEST_TIMEOUT_SECS"])
            .and_then(|s| s.parse().ok())
            .unwrap_or(REQUEST_TIMEOUT_SECS);

        let max_direct_upload_mb = var(&["MAX_DIRECT_UPLOAD_MB"])
            .map(|s| {
                s.parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("MAX_DIRECT_UPLOAD_MB must be a valid number"))
            })
            .transpose()?
            .unwrap_or(MAX_DIRECT_UPLOAD_MB);
        let max_direct_upload_bytes = max_direct_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_DIRECT_UPLOAD_MB is too large"))?;

        let server = ServerConfig {
            port,
            cors_origins,
            environment,
            request_timeout_secs,
            max_direct_upload_bytes,
            log_json: var(&["LOG_FORMAT"]).is_some_and(|f| f.eq_ignore_ascii_case("json")),
        };

        let storage = StorageConfig {
            bucket: var(&["S3_BUCKET", "AWS_BUCKET_NAME"]),
            region: var(&["S3_REGION", "AWS_REGION"])
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            access_key_id: var(&["AWS_ACCESS_KEY_ID", "AWS_KEY_ID"]),
            secret_access_key: var(&["AWS_SECRET_ACCESS_KEY", "AWS_SECRET"]),
            session_token: var(&["AWS_SESSION_TOKEN"]),
            endpoint: var(&["S3_ENDPOINT"]).map(|e| e.trim_end_matches('/').to_string()),
        };

        let config = Config { server, storage };
        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.max_direct_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_DIRECT_UPLOAD_MB must be greater than 0"));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be greater than 0"));
        }

        if self.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if let Some(endpoint) = &self.storage.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(anyhow::anyhow!("S3_ENDPOINT must be an http(s) URL"));
            }
        }

        Ok(())
    }
}
