//! Resize parameter validation
//!
//! Turns a raw [`ResizeRequest`] into a [`ResizeConfig`]. Rules run in a fixed
//! order and the first failure wins; every rule has its own message so clients
//! can tell the failures apart.

use crate::constants::{
    DEFAULT_QUALITY, MAX_DIMENSION, MAX_OUTPUT_PIXELS, MAX_QUALITY, MIN_QUALITY,
};
use crate::models::{Dimension, FitMode, ResizeConfig, ResizeRequest};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Digits with an optional fractional part, or a bare fractional part.
/// No sign, no exponent, no whitespace.
static DECIMAL_NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)$").expect("decimal numeral regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty image")]
    EmptyImage,

    #[error("missing width and height")]
    MissingDimensions,

    #[error("non-decimal width or height")]
    NonDecimalDimension,

    #[error("width or height exceeds {max} pixels")]
    DimensionTooLarge { max: u32 },

    #[error("requested size exceeds {max} pixels")]
    AreaTooLarge { max: u64 },

    #[error("invalid quality value (1 - 100)")]
    InvalidQuality,

    #[error("missing fit")]
    MissingFit,

    #[error("invalid fit")]
    InvalidFit,
}

impl ValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyImage => "EMPTY_IMAGE",
            ValidationError::MissingDimensions => "MISSING_DIMENSIONS",
            ValidationError::NonDecimalDimension => "NON_DECIMAL_DIMENSION",
            ValidationError::DimensionTooLarge { .. } => "DIMENSION_TOO_LARGE",
            ValidationError::AreaTooLarge { .. } => "AREA_TOO_LARGE",
            ValidationError::InvalidQuality => "INVALID_QUALITY",
            ValidationError::MissingFit => "MISSING_FIT",
            ValidationError::InvalidFit => "INVALID_FIT",
        }
    }
}

/// True when `s` is a non-negative decimal numeral.
pub fn is_decimal(s: &str) -> bool {
    DECIMAL_NUMERAL.is_match(s)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Validate and normalize resize parameters.
pub fn validate_resize_config(request: &ResizeRequest) -> Result<ResizeConfig, ValidationError> {
    let width = present(&request.width);
    let height = present(&request.height);

    if width.is_none() && height.is_none() {
        tracing::debug!(rule = "dimensions", "missing width and height");
        return Err(ValidationError::MissingDimensions);
    }

    if width.is_some_and(|w| !is_decimal(w)) || height.is_some_and(|h| !is_decimal(h)) {
        tracing::debug!(
            rule = "dimensions",
            width = ?request.width,
            height = ?request.height,
            "non-decimal width or height"
        );
        return Err(ValidationError::NonDecimalDimension);
    }

    let width = normalize_dimension(width)?;
    let height = normalize_dimension(height)?;

    // "0" passes the numeral check but asks for nothing.
    if width.is_infer() && height.is_infer() {
        tracing::debug!(rule = "dimensions", "width and height are both zero");
        return Err(ValidationError::MissingDimensions);
    }

    // An inferred side is only known after decoding; the codec checks those.
    if let (Dimension::Pixels(w), Dimension::Pixels(h)) = (width, height) {
        if u64::from(w) * u64::from(h) > MAX_OUTPUT_PIXELS {
            tracing::debug!(rule = "dimensions", width = w, height = h, "area too large");
            return Err(ValidationError::AreaTooLarge {
                max: MAX_OUTPUT_PIXELS,
            });
        }
    }

    let quality = match present(&request.quality) {
        None => DEFAULT_QUALITY,
        Some(raw) => normalize_quality(raw)?,
    };

    let fit = match request.fit.as_deref() {
        None => FitMode::default(),
        Some("") => {
            tracing::debug!(rule = "fit", "missing fit");
            return Err(ValidationError::MissingFit);
        }
        Some(raw) => FitMode::parse(raw).ok_or_else(|| {
            tracing::debug!(rule = "fit", fit = %raw, "invalid fit");
            ValidationError::InvalidFit
        })?,
    };

    Ok(ResizeConfig {
        width,
        height,
        quality,
        fit,
    })
}

/// `raw` must already satisfy [`is_decimal`].
fn normalize_dimension(raw: Option<&str>) -> Result<Dimension, ValidationError> {
    let Some(raw) = raw else {
        return Ok(Dimension::Infer);
    };

    let value: f64 = raw
        .parse()
        .map_err(|_| ValidationError::NonDecimalDimension)?;
    let rounded = value.round();

    if rounded > f64::from(MAX_DIMENSION) {
        tracing::debug!(rule = "dimensions", value = %raw, "dimension too large");
        return Err(ValidationError::DimensionTooLarge { max: MAX_DIMENSION });
    }

    let px = rounded as u32;
    Ok(if px == 0 {
        Dimension::Infer
    } else {
        Dimension::Pixels(px)
    })
}

fn normalize_quality(raw: &str) -> Result<u8, ValidationError> {
    if !is_decimal(raw) {
        tracing::debug!(rule = "quality", quality = %raw, "invalid quality value (1 - 100)");
        return Err(ValidationError::InvalidQuality);
    }

    let value: f64 = raw.parse().map_err(|_| ValidationError::InvalidQuality)?;
    if value < f64::from(MIN_QUALITY) || value > f64::from(MAX_QUALITY) {
        tracing::debug!(rule = "quality", quality = %raw, "invalid quality value (1 - 100)");
        return Err(ValidationError::InvalidQuality);
    }

    Ok(value.round() as u8)
}
