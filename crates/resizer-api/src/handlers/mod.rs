pub mod health;
pub mod resize;
pub mod resize_staged;
pub mod upload_url;

use crate::error::HttpAppError;
use crate::services::dispatcher::ResizedImage;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use resizer_core::AppError;

/// 200 response carrying the encoded image.
fn image_response(image: ResizedImage) -> Result<Response, HttpAppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, image.content_type)
        .header(header::CONTENT_LENGTH, image.data.len())
        .body(Body::from(image.data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
}
