use crate::error::HttpAppError;
use crate::services::dispatcher::{self, PayloadSource};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use resizer_core::{AppError, StagedResizeRequest};
use std::sync::Arc;

/// Resize an object that was previously uploaded through an upload URL.
#[tracing::instrument(skip(state, body), fields(operation = "resize_staged_image"))]
pub async fn resize_staged_image(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StagedResizeRequest>, JsonRejection>,
) -> Result<Response, HttpAppError> {
    let Json(body) = body?;

    let key = body
        .key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("missing key".to_string()))?;

    tracing::debug!(key = %key, "Staged resize request received");

    let resized = dispatcher::dispatch(&state, PayloadSource::Staged(key), &body.params).await?;
    super::image_response(resized)
}
