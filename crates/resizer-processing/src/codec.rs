//! Codec contract: one resize request in, one encoded image out.

use crate::fit::GeometryError;
use bytes::Bytes;
use resizer_core::{FitMode, ResizeConfig};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
}

impl OutputFormat {
    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => resizer_core::constants::JPEG_CONTENT_TYPE,
        }
    }
}

/// Chroma subsampling of the encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaSubsampling {
    /// Full-resolution chroma.
    #[default]
    Cs444,
    Cs420,
}

impl ChromaSubsampling {
    /// Pixel block covered by one chroma sample.
    pub fn pixel_size(self) -> (u8, u8) {
        match self {
            ChromaSubsampling::Cs444 => (1, 1),
            ChromaSubsampling::Cs420 => (2, 2),
        }
    }
}

/// Everything the codec needs to produce one derivative.
///
/// A `None` dimension is derived by the codec from the source aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeInstruction {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: FitMode,
    pub format: OutputFormat,
    pub quality: u8,
    pub chroma: ChromaSubsampling,
    /// Carry EXIF and ICC data over from the source.
    pub keep_metadata: bool,
}

impl From<&ResizeConfig> for ResizeInstruction {
    fn from(config: &ResizeConfig) -> Self {
        Self {
            width: config.width.pixels(),
            height: config.height.pixels(),
            fit: config.fit,
            format: OutputFormat::Jpeg,
            quality: config.quality,
            chroma: ChromaSubsampling::Cs444,
            keep_metadata: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("failed to encode image: {0}")]
    Encode(String),
}

/// Resamples and encodes images. Implementations are CPU-bound and blocking;
/// async callers must run them off the runtime threads.
pub trait ImageCodec: Send + Sync {
    fn resize(&self, input: &[u8], instruction: &ResizeInstruction) -> Result<Bytes, CodecError>;
}
