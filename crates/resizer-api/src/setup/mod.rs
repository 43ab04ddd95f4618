//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use resizer_core::Config;
use resizer_processing::MozJpegCodec;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.server.log_json)
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.server.environment,
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config)?;

    let state = Arc::new(AppState::new(storage, Arc::new(MozJpegCodec::new())));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
