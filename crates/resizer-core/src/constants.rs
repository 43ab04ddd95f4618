//! Shared limits and defaults.
//!
//! The direct/staged threshold lives here so the client orchestrator and the
//! server-side documentation agree on a single value.

/// Default JPEG quality when the request omits `quality`.
pub const DEFAULT_QUALITY: u8 = 75;

/// Inclusive quality bounds.
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Largest output dimension the JPEG format can represent.
pub const MAX_DIMENSION: u32 = 65_500;

/// Files strictly smaller than this are sent inline to `POST /resize`;
/// anything at or above it goes through the staged upload flow (4.3 MiB).
pub const DIRECT_UPLOAD_MAX_BYTES: u64 = 4_508_876;

/// Largest output canvas, in pixels (16383 x 16383).
pub const MAX_OUTPUT_PIXELS: u64 = 268_402_689;

/// Upload authorizations expire this many seconds after issuance.
pub const UPLOAD_URL_EXPIRY_SECS: u64 = 30;

/// Upper bound of the `content-length-range` policy condition (50 MiB).
pub const MAX_STAGED_UPLOAD_BYTES: u64 = 52_428_800;

/// Region used when neither `S3_REGION` nor `AWS_REGION` is set.
pub const DEFAULT_REGION: &str = "ap-northeast-2";

/// Content type of every resize response.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";
