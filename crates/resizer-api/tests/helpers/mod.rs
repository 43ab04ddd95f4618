//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p resizer-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStoreExt, PutPayload};
use resizer_api::setup::routes;
use resizer_api::state::AppState;
use resizer_core::{Config, StorageConfig};
use resizer_processing::MozJpegCodec;
use resizer_storage::{create_storage, PostPolicyIssuer, S3Fetcher};
use std::sync::Arc;

pub const TEST_BUCKET: &str = "resizer-test-bucket";

/// Test application: server plus the in-memory object store behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemory>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Place an object in the bucket, as a completed staged upload would.
    pub async fn stage_object(&self, key: &str, data: Vec<u8>) {
        self.store
            .put(&Path::from(key), PutPayload::from(data))
            .await
            .expect("Failed to seed object");
    }
}

pub fn test_storage_config() -> StorageConfig {
    StorageConfig {
        bucket: Some(TEST_BUCKET.to_string()),
        region: "ap-northeast-2".to_string(),
        access_key_id: Some("AKIDEXAMPLE".to_string()),
        secret_access_key: Some("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string()),
        session_token: None,
        endpoint: None,
    }
}

/// Server configuration with a 1 MiB direct body limit.
pub fn test_config() -> Config {
    Config::from_lookup(|name| match name {
        "MAX_DIRECT_UPLOAD_MB" => Some("1".to_string()),
        "ENVIRONMENT" => Some("test".to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}

/// Setup test app with an in-memory bucket and a fixture signer.
pub async fn setup_test_app() -> TestApp {
    let store = Arc::new(InMemory::new());
    let fetcher = S3Fetcher::with_store(store.clone(), TEST_BUCKET);
    let issuer = PostPolicyIssuer::from_config(&test_storage_config())
        .expect("Failed to create issuer");

    let state = Arc::new(AppState {
        fetcher: Arc::new(fetcher),
        issuer: Arc::new(issuer),
        codec: Arc::new(MozJpegCodec::new()),
    });

    let router = routes::setup_routes(&test_config(), state).expect("Failed to setup routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, store }
}

/// App whose storage settings are missing, as on a host without S3 variables.
pub async fn setup_unconfigured_app() -> TestServer {
    let config = test_config();
    let backends = create_storage(&config.storage).expect("Failed to create storage");
    let state = Arc::new(AppState::new(backends, Arc::new(MozJpegCodec::new())));
    let router = routes::setup_routes(&config, state).expect("Failed to setup routes");
    TestServer::new(router).expect("Failed to create test server")
}
