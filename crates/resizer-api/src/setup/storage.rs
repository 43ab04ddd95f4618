//! Storage setup and initialization

use anyhow::{Context, Result};
use resizer_core::Config;
use resizer_storage::{create_storage, StorageBackends};

/// Build the fetcher and the upload-url issuer. Missing storage settings are
/// not fatal here; they surface on the first staged request.
pub fn setup_storage(config: &Config) -> Result<StorageBackends> {
    tracing::info!("Initializing object storage...");
    let backends =
        create_storage(&config.storage).context("Failed to initialize object storage")?;
    tracing::info!(
        configured = config.storage.is_complete(),
        "Object storage initialized"
    );
    Ok(backends)
}
