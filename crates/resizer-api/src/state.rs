use resizer_processing::ImageCodec;
use resizer_storage::{ObjectFetcher, StorageBackends, UploadUrlIssuer};
use std::sync::Arc;

/// Shared, immutable handles used by every request.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn ObjectFetcher>,
    pub issuer: Arc<dyn UploadUrlIssuer>,
    pub codec: Arc<dyn ImageCodec>,
}

impl AppState {
    pub fn new(storage: StorageBackends, codec: Arc<dyn ImageCodec>) -> Self {
        Self {
            fetcher: storage.fetcher,
            issuer: storage.issuer,
            codec,
        }
    }
}
