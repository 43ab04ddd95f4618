pub mod resize;
pub mod upload;

pub use resize::{Dimension, FitMode, ResizeConfig, ResizeRequest, StagedResizeRequest};
pub use upload::{UploadAuthorization, UploadUrlQuery, UploadUrlResponse};
