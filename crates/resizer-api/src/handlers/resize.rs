use crate::error::HttpAppError;
use crate::services::dispatcher::{self, PayloadSource};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::Response,
};
use bytes::Bytes;
use resizer_core::ResizeRequest;
use std::sync::Arc;

/// Resize an image sent inline as `multipart/form-data`.
///
/// Fields: `image` (file), `width`, `height`, `quality`, `fit`. Unknown fields
/// are ignored; a missing `image` field is reported as an empty image.
#[tracing::instrument(skip(state, multipart), fields(operation = "resize_image"))]
pub async fn resize_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let mut image = Bytes::new();
    let mut request = ResizeRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        match name.as_str() {
            "image" => image = field.bytes().await?,
            "width" => request.width = Some(field.text().await?),
            "height" => request.height = Some(field.text().await?),
            "quality" => request.quality = Some(field.text().await?),
            "fit" => request.fit = Some(field.text().await?),
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    tracing::debug!(
        image_bytes = image.len(),
        width = request.width.as_deref(),
        height = request.height.as_deref(),
        quality = request.quality.as_deref(),
        fit = request.fit.as_deref(),
        "Direct resize request received"
    );

    let resized = dispatcher::dispatch(&state, PayloadSource::Inline(image), &request).await?;
    super::image_response(resized)
}
