//! Output geometry for each fit mode.
//!
//! Pure arithmetic: given the source size, the requested box and the fit mode,
//! decide which part of the source to keep, what size to resample it to and
//! whether to letterbox the result. A missing dimension is derived from the
//! source aspect ratio here and nowhere else.

use resizer_core::constants::{MAX_DIMENSION, MAX_OUTPUT_PIXELS};
use resizer_core::FitMode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("source image has no pixels")]
    EmptySource,

    #[error("neither width nor height was requested")]
    NoTarget,

    #[error("output {width}x{height} exceeds the maximum image size")]
    TooLarge { width: u64, height: u64 },
}

/// Rectangle in source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Letterbox canvas; the resampled image is drawn at (`x`, `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pad {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitPlan {
    /// Applied to the source before resampling.
    pub crop: Option<Crop>,
    pub resize_width: u32,
    pub resize_height: u32,
    pub pad: Option<Pad>,
}

impl FitPlan {
    pub fn output_size(&self) -> (u32, u32) {
        match self.pad {
            Some(pad) => (pad.width, pad.height),
            None => (self.resize_width, self.resize_height),
        }
    }
}

fn scale(len: u32, factor: f64) -> u64 {
    ((f64::from(len) * factor).round() as u64).max(1)
}

fn check(width: u64, height: u64) -> Result<(u32, u32), GeometryError> {
    if width > u64::from(MAX_DIMENSION)
        || height > u64::from(MAX_DIMENSION)
        || width * height > MAX_OUTPUT_PIXELS
    {
        return Err(GeometryError::TooLarge { width, height });
    }
    Ok((width as u32, height as u32))
}

/// Plan the resize of a `source` sized image into the requested box.
pub fn plan(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
    fit: FitMode,
) -> Result<FitPlan, GeometryError> {
    let (sw, sh) = source;
    if sw == 0 || sh == 0 {
        return Err(GeometryError::EmptySource);
    }

    let resize_only = |w: u64, h: u64| -> Result<FitPlan, GeometryError> {
        let (w, h) = check(w, h)?;
        Ok(FitPlan {
            crop: None,
            resize_width: w,
            resize_height: h,
            pad: None,
        })
    };

    let (w, h) = match (width, height) {
        (None, None) => return Err(GeometryError::NoTarget),
        // With one side given the box has the source ratio, so every fit
        // mode reduces to a plain proportional scale.
        (Some(w), None) => {
            return resize_only(u64::from(w), scale(sh, f64::from(w) / f64::from(sw)));
        }
        (None, Some(h)) => {
            return resize_only(scale(sw, f64::from(h) / f64::from(sh)), u64::from(h));
        }
        (Some(w), Some(h)) => (w, h),
    };

    let fx = f64::from(w) / f64::from(sw);
    let fy = f64::from(h) / f64::from(sh);

    match fit {
        FitMode::Fill => resize_only(u64::from(w), u64::from(h)),
        FitMode::Inside => {
            let f = fx.min(fy);
            resize_only(scale(sw, f).min(u64::from(w)), scale(sh, f).min(u64::from(h)))
        }
        FitMode::Outside => {
            let f = fx.max(fy);
            resize_only(scale(sw, f).max(u64::from(w)), scale(sh, f).max(u64::from(h)))
        }
        FitMode::Cover => {
            let (w, h) = check(u64::from(w), u64::from(h))?;
            // Keep the centered region of the source that has the box ratio.
            let (cw, ch) = if fx > fy {
                (sw, (f64::from(sw) * f64::from(h) / f64::from(w)).round() as u32)
            } else {
                ((f64::from(sh) * f64::from(w) / f64::from(h)).round() as u32, sh)
            };
            let cw = cw.clamp(1, sw);
            let ch = ch.clamp(1, sh);
            let crop = (cw, ch) != (sw, sh);
            Ok(FitPlan {
                crop: crop.then_some(Crop {
                    x: (sw - cw) / 2,
                    y: (sh - ch) / 2,
                    width: cw,
                    height: ch,
                }),
                resize_width: w,
                resize_height: h,
                pad: None,
            })
        }
        FitMode::Contain => {
            let (w, h) = check(u64::from(w), u64::from(h))?;
            let f = fx.min(fy);
            let rw = scale(sw, f).min(u64::from(w)) as u32;
            let rh = scale(sh, f).min(u64::from(h)) as u32;
            let padded = (rw, rh) != (w, h);
            Ok(FitPlan {
                crop: None,
                resize_width: rw,
                resize_height: rh,
                pad: padded.then_some(Pad {
                    width: w,
                    height: h,
                    x: (w - rw) / 2,
                    y: (h - rh) / 2,
                }),
            })
        }
    }
}
