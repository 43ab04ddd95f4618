//! Resize dispatch shared by the direct and staged endpoints.
//!
//! Order is fixed: validate the parameters, then (staged only) read the object,
//! then run the codec on a blocking worker. Nothing is retried and nothing is
//! returned on partial failure.

use crate::error::HttpAppError;
use crate::state::AppState;
use bytes::Bytes;
use resizer_core::{
    validate_resize_config, AppError, ResizeConfig, ResizeRequest, StagedResize, Transition,
    ValidationError,
};
use resizer_processing::{OutputFormat, ResizeInstruction};
use std::time::Instant;

/// Where the source image comes from.
#[derive(Debug, Clone)]
pub enum PayloadSource {
    /// Bytes received in the request body.
    Inline(Bytes),
    /// Object key of a previously staged upload.
    Staged(String),
}

/// Encoded output plus its content type.
#[derive(Debug, Clone)]
pub struct ResizedImage {
    pub data: Bytes,
    pub content_type: &'static str,
}

pub async fn dispatch(
    state: &AppState,
    source: PayloadSource,
    request: &ResizeRequest,
) -> Result<ResizedImage, HttpAppError> {
    if matches!(&source, PayloadSource::Inline(data) if data.is_empty()) {
        return Err(ValidationError::EmptyImage.into());
    }

    let config = validate_resize_config(request)?;

    match source {
        PayloadSource::Inline(data) => resize(state, data, &config).await,
        PayloadSource::Staged(key) => dispatch_staged(state, key, &config).await,
    }
}

async fn dispatch_staged(
    state: &AppState,
    key: String,
    config: &ResizeConfig,
) -> Result<ResizedImage, HttpAppError> {
    let stage = advance(StagedResize::Uploaded { key: key.clone() }, Transition::BeginFetch)?;

    let data = match state.fetcher.fetch_by_key(&key).await {
        Ok(data) => data,
        Err(e) => {
            advance(stage, Transition::Fail)?;
            return Err(e.into());
        }
    };
    let stage = advance(stage, Transition::FetchSucceeded)?;

    match resize(state, data, config).await {
        Ok(image) => {
            advance(stage, Transition::ResizeSucceeded)?;
            Ok(image)
        }
        Err(e) => {
            advance(stage, Transition::Fail)?;
            Err(e)
        }
    }
}

fn advance(stage: StagedResize, transition: Transition) -> Result<StagedResize, AppError> {
    let next = stage
        .apply(transition)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    match &next {
        StagedResize::Failed { stage } => {
            tracing::warn!(stage = %stage, "Staged resize failed");
        }
        state => {
            tracing::debug!(stage = state.name(), key = state.key(), "Staged resize advanced");
        }
    }
    Ok(next)
}

async fn resize(
    state: &AppState,
    data: Bytes,
    config: &ResizeConfig,
) -> Result<ResizedImage, HttpAppError> {
    let instruction = ResizeInstruction::from(config);
    let codec = state.codec.clone();
    let input_bytes = data.len();
    let started = Instant::now();

    let output = tokio::task::spawn_blocking(move || codec.resize(&data, &instruction))
        .await
        .map_err(|e| AppError::Internal(format!("resize task failed: {}", e)))??;

    tracing::info!(
        width = %config.width,
        height = %config.height,
        fit = %config.fit,
        quality = config.quality,
        input_bytes,
        output_bytes = output.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Image resized"
    );

    Ok(ResizedImage {
        data: output,
        content_type: OutputFormat::Jpeg.to_mime_type(),
    })
}
