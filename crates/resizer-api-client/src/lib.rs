//! HTTP client for the resizer API.
//!
//! Small files are posted inline to `POST /resize`. Anything at or above
//! [`DIRECT_UPLOAD_MAX_BYTES`] is uploaded straight to object storage with a
//! presigned POST and then resized by key through `POST /resize/staged`.
//! The CLI uses this client directly.

pub mod api;

use reqwest::{Client, Response};
use resizer_core::constants::DIRECT_UPLOAD_MAX_BYTES;
use resizer_core::TransitionError;
use std::time::Duration;
use thiserror::Error;

pub use api::{extension_of, ResizeParams};

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The resizer API answered with a non-success status.
    #[error("resizer API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Object storage rejected the staged upload.
    #[error("storage upload failed with {status}: {message}")]
    Upload { status: u16, message: String },

    #[error("upload authorization has no key field")]
    MissingKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Lifecycle(#[from] TransitionError),
}

impl ClientError {
    /// HTTP status reported by the server, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::Upload { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::MissingKey | ClientError::Lifecycle(_) => None,
        }
    }
}

/// Which route a payload of a given size takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePath {
    Direct,
    Staged,
}

impl ResizePath {
    pub fn for_size(len: u64) -> Self {
        if len < DIRECT_UPLOAD_MAX_BYTES {
            ResizePath::Direct
        } else {
            ResizePath::Staged
        }
    }
}

/// HTTP client for the resizer API.
#[derive(Clone, Debug)]
pub struct ResizerClient {
    client: Client,
    base_url: String,
}

impl ResizerClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: RESIZER_API_URL (or API_URL), defaulting
    /// to a local server.
    pub fn from_env() -> ClientResult<Self> {
        let base_url = std::env::var("RESIZER_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Turn a non-success response into [`ClientError::Api`] carrying the
/// server's plain-text reason.
async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
