use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use resizer_core::{UploadUrlQuery, UploadUrlResponse};
use std::sync::Arc;

/// Issue a short-lived presigned POST for a staged upload.
#[tracing::instrument(skip(state, query), fields(operation = "issue_upload_url"))]
pub async fn issue_upload_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadUrlQuery>,
) -> Result<Json<UploadUrlResponse>, HttpAppError> {
    let authorization = state.issuer.issue_upload_url(query.ext.as_deref()).await?;

    tracing::info!(
        key = %authorization.key,
        expires_at = %authorization.expires_at,
        "Upload URL issued"
    );

    Ok(Json(authorization.into()))
}
