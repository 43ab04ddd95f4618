//! Resizer Core Library
//!
//! Domain models, error types, configuration and resize-parameter validation
//! shared by every resizer component.

pub mod config;
pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod validation;

pub use config::{Config, ServerConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use lifecycle::{FailedStage, StagedResize, Transition, TransitionError};
pub use models::{
    Dimension, FitMode, ResizeConfig, ResizeRequest, StagedResizeRequest, UploadAuthorization,
    UploadUrlQuery, UploadUrlResponse,
};
pub use validation::{validate_resize_config, ValidationError};
