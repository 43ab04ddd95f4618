//! Resizer Storage Library
//!
//! Object-storage plumbing for the staged resize flow: issuing presigned POST
//! authorizations and reading uploaded objects back by key.
//!
//! # Storage key format
//!
//! `<YYYY-MM-DD>/<sha256 hex of a UUIDv4>[.<ext>]`. Keys must not be empty,
//! start with `/` or contain a `..` segment. Key handling is centralized in the
//! `keys` module.

pub mod factory;
pub mod keys;
pub mod presign;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage, StorageBackends};
pub use presign::PostPolicyIssuer;
pub use s3::S3Fetcher;
pub use traits::{ObjectFetcher, StorageError, StorageResult, UploadUrlIssuer};
