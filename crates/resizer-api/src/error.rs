//! HTTP error response conversion
//!
//! Handlers return `Result<Response, HttpAppError>`. Every failure is rendered
//! as its status code plus a plain-text reason taken from
//! [`ErrorMetadata::client_message`], so server-side details never reach the
//! client.

use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use resizer_core::{AppError, ErrorMetadata, LogLevel, ValidationError};
use resizer_processing::{CodecError, GeometryError};
use resizer_storage::StorageError;

/// Wrapper type for AppError to implement IntoResponse.
/// Needed because of the orphan rule: IntoResponse and AppError both live in
/// other crates.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(AppError::Validation(err))
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::BadRequest(format!(
            "invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("request body too large".to_string())
        } else {
            AppError::BadRequest(format!("invalid multipart body: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::BadRequest(msg),
            StorageError::ConfigError(msg) => AppError::Configuration(msg),
            StorageError::DownloadFailed(msg) | StorageError::SigningFailed(msg) => {
                AppError::Storage(msg)
            }
        };
        HttpAppError(app)
    }
}

impl From<CodecError> for HttpAppError {
    fn from(err: CodecError) -> Self {
        let app = match err {
            // An inferred side can push the output past the cap after decoding.
            CodecError::Geometry(GeometryError::TooLarge { .. }) => {
                AppError::BadRequest(err.to_string())
            }
            err => AppError::ImageProcessing(err.to_string()),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code, "Request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, app_error.client_message()).into_response()
    }
}
