//! Resizer API Library
//!
//! HTTP surface of the resize service: handlers, error rendering and
//! application setup.

mod handlers;
mod services;
pub mod setup;
pub mod telemetry;

pub mod error;
pub mod state;

pub use error::HttpAppError;
pub use services::dispatcher::{PayloadSource, ResizedImage};
