//! Resizer Processing Library
//!
//! Decodes an uploaded image, fits it to the requested box and encodes a JPEG
//! derivative.

pub mod codec;
pub mod fit;
pub mod jpeg;

pub use codec::{ChromaSubsampling, CodecError, ImageCodec, OutputFormat, ResizeInstruction};
pub use fit::{FitPlan, GeometryError};
pub use jpeg::MozJpegCodec;
