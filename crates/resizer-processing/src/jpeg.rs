//! JPEG derivative codec: `image` for decoding and resampling, mozjpeg for
//! encoding, img-parts to carry metadata across.

use crate::codec::{CodecError, ImageCodec, ResizeInstruction};
use crate::fit;
use bytes::Bytes;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageReader, Rgb, RgbImage};
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::{ImageEXIF, ImageICC};
use std::io::Cursor;

/// Letterbox colour for `contain` and the backdrop for transparent pixels.
const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone, Copy)]
pub struct MozJpegCodec {
    filter: FilterType,
}

impl Default for MozJpegCodec {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl MozJpegCodec {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode(input: &[u8]) -> Result<DynamicImage, CodecError> {
        ImageReader::new(Cursor::new(input))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn render(
        &self,
        img: DynamicImage,
        instruction: &ResizeInstruction,
    ) -> Result<RgbImage, CodecError> {
        let plan = fit::plan(
            img.dimensions(),
            instruction.width,
            instruction.height,
            instruction.fit,
        )?;

        tracing::debug!(
            source_width = img.width(),
            source_height = img.height(),
            crop = ?plan.crop,
            resize_width = plan.resize_width,
            resize_height = plan.resize_height,
            pad = ?plan.pad,
            fit = %instruction.fit,
            "Planned resize"
        );

        let mut img = img;
        if let Some(crop) = plan.crop {
            img = img.crop_imm(crop.x, crop.y, crop.width, crop.height);
        }
        if img.dimensions() != (plan.resize_width, plan.resize_height) {
            img = img.resize_exact(plan.resize_width, plan.resize_height, self.filter);
        }

        let rgb = flatten(img);

        Ok(match plan.pad {
            Some(pad) => {
                let mut canvas = RgbImage::from_pixel(pad.width, pad.height, BACKGROUND);
                imageops::overlay(&mut canvas, &rgb, i64::from(pad.x), i64::from(pad.y));
                canvas
            }
            None => rgb,
        })
    }

    fn encode(rgb: &RgbImage, instruction: &ResizeInstruction) -> Result<Vec<u8>, CodecError> {
        let (width, height) = rgb.dimensions();
        let (cw, ch) = instruction.chroma.pixel_size();
        let quality = f32::from(instruction.quality);

        // libjpeg reports fatal errors by unwinding.
        std::panic::catch_unwind(|| -> std::io::Result<Vec<u8>> {
            let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
            comp.set_size(width as usize, height as usize);
            comp.set_quality(quality);
            comp.set_chroma_sampling_pixel_sizes((1, 1), (cw, ch));
            comp.set_optimize_coding(true);

            let mut comp = comp.start_compress(Vec::new())?;
            comp.write_scanlines(rgb.as_raw())?;
            comp.finish()
        })
        .map_err(|_| CodecError::Encode("JPEG encoder aborted".to_string()))?
        .map_err(|e| CodecError::Encode(e.to_string()))
    }
}

impl ImageCodec for MozJpegCodec {
    fn resize(&self, input: &[u8], instruction: &ResizeInstruction) -> Result<Bytes, CodecError> {
        let start = std::time::Instant::now();

        let img = Self::decode(input)?;
        let rgb = self.render(img, instruction)?;
        let encoded = Self::encode(&rgb, instruction)?;

        let output = if instruction.keep_metadata {
            let (exif, icc) = source_metadata(input);
            attach_metadata(encoded, exif, icc)?
        } else {
            Bytes::from(encoded)
        };

        tracing::debug!(
            input_bytes = input.len(),
            output_bytes = output.len(),
            width = rgb.width(),
            height = rgb.height(),
            quality = instruction.quality,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "JPEG derivative encoded"
        );

        Ok(output)
    }
}

/// Drop alpha by compositing onto [`BACKGROUND`].
fn flatten(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let p = rgba.get_pixel(x, y);
        let alpha = u16::from(p[3]);
        let blend = |c: u8, bg: u8| -> u8 {
            ((u16::from(c) * alpha + u16::from(bg) * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([
            blend(p[0], BACKGROUND[0]),
            blend(p[1], BACKGROUND[1]),
            blend(p[2], BACKGROUND[2]),
        ])
    })
}

/// EXIF and ICC segments of a JPEG or PNG source, if any.
fn source_metadata(input: &[u8]) -> (Option<Bytes>, Option<Bytes>) {
    let data = Bytes::copy_from_slice(input);
    if let Ok(jpeg) = Jpeg::from_bytes(data.clone()) {
        return (jpeg.exif(), jpeg.icc_profile());
    }
    if let Ok(png) = Png::from_bytes(data) {
        return (png.exif(), png.icc_profile());
    }
    (None, None)
}

fn attach_metadata(
    encoded: Vec<u8>,
    exif: Option<Bytes>,
    icc: Option<Bytes>,
) -> Result<Bytes, CodecError> {
    let encoded = Bytes::from(encoded);
    if exif.is_none() && icc.is_none() {
        return Ok(encoded);
    }

    let mut jpeg = Jpeg::from_bytes(encoded).map_err(|e| CodecError::Encode(e.to_string()))?;
    jpeg.set_icc_profile(icc);
    jpeg.set_exif(exif);
    Ok(jpeg.encoder().bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ChromaSubsampling, OutputFormat};
    use image::{ImageFormat, Rgba, RgbaImage};
    use resizer_core::FitMode;

    fn gradient_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 255 / width) as u8, (y * 255 / height) as u8, 180, 255])
        });
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn instruction(width: Option<u32>, height: Option<u32>, fit: FitMode) -> ResizeInstruction {
        ResizeInstruction {
            width,
            height,
            fit,
            format: OutputFormat::Jpeg,
            quality: 75,
            chroma: ChromaSubsampling::Cs444,
            keep_metadata: true,
        }
    }

    fn decoded(bytes: &[u8]) -> DynamicImage {
        image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).unwrap()
    }

    /// Sampling factor byte of every component in the first SOF segment.
    fn sampling_factors(jpeg: &[u8]) -> Vec<u8> {
        let mut i = 2;
        while i + 4 < jpeg.len() {
            assert_eq!(jpeg[i], 0xFF);
            let marker = jpeg[i + 1];
            let len = usize::from(u16::from_be_bytes([jpeg[i + 2], jpeg[i + 3]]));
            if matches!(marker, 0xC0 | 0xC1 | 0xC2) {
                let components = usize::from(jpeg[i + 9]);
                return (0..components).map(|c| jpeg[i + 11 + c * 3]).collect();
            }
            i += 2 + len;
        }
        panic!("no SOF segment");
    }

    #[test]
    fn width_only_derives_height_from_aspect_ratio() {
        let out = MozJpegCodec::new()
            .resize(
                &gradient_png(600, 400),
                &instruction(Some(300), None, FitMode::Cover),
            )
            .unwrap();
        assert_eq!(&out[..2], &[0xFF, 0xD8]);
        assert_eq!(decoded(&out).dimensions(), (300, 200));
    }

    #[test]
    fn every_fit_produces_its_geometry() {
        let input = gradient_png(600, 400);
        let codec = MozJpegCodec::new();
        let cases = [
            (FitMode::Cover, (200, 200)),
            (FitMode::Contain, (200, 200)),
            (FitMode::Fill, (200, 200)),
            (FitMode::Inside, (200, 133)),
            (FitMode::Outside, (300, 200)),
        ];
        for (fit, expected) in cases {
            let out = codec
                .resize(&input, &instruction(Some(200), Some(200), fit))
                .unwrap();
            assert_eq!(decoded(&out).dimensions(), expected, "{fit}");
        }
    }

    #[test]
    fn contain_letterboxes_in_black() {
        let out = MozJpegCodec::new()
            .resize(
                &gradient_png(600, 400),
                &instruction(Some(200), Some(200), FitMode::Contain),
            )
            .unwrap();
        let img = decoded(&out).to_rgb8();
        let corner = img.get_pixel(100, 2);
        assert!(corner.0.iter().all(|&c| c < 16), "{corner:?}");
    }

    #[test]
    fn output_is_deterministic() {
        let input = gradient_png(320, 240);
        let codec = MozJpegCodec::new();
        let ins = instruction(Some(100), Some(100), FitMode::Cover);
        let first = codec.resize(&input, &ins).unwrap();
        let second = codec.resize(&input, &ins).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn chroma_is_not_subsampled() {
        let input = gradient_png(64, 64);
        let codec = MozJpegCodec::new();

        let full = codec
            .resize(&input, &instruction(Some(32), None, FitMode::Cover))
            .unwrap();
        assert_eq!(sampling_factors(&full), vec![0x11, 0x11, 0x11]);

        let mut halved = instruction(Some(32), None, FitMode::Cover);
        halved.chroma = ChromaSubsampling::Cs420;
        let out = codec.resize(&input, &halved).unwrap();
        assert_eq!(sampling_factors(&out), vec![0x22, 0x11, 0x11]);
    }

    #[test]
    fn quality_changes_the_output() {
        let input = gradient_png(200, 200);
        let codec = MozJpegCodec::new();
        let mut low = instruction(Some(200), None, FitMode::Cover);
        low.quality = 10;
        let mut high = low;
        high.quality = 95;
        let low = codec.resize(&input, &low).unwrap();
        let high = codec.resize(&input, &high).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn exif_survives_the_resize() {
        let codec = MozJpegCodec::new();
        let plain = codec
            .resize(
                &gradient_png(100, 100),
                &instruction(Some(100), None, FitMode::Cover),
            )
            .unwrap();

        let exif = Bytes::from_static(b"II*\x00\x08\x00\x00\x00\x00\x00");
        let mut source = Jpeg::from_bytes(plain).unwrap();
        source.set_exif(Some(exif.clone()));
        let source = source.encoder().bytes();

        let out = codec
            .resize(&source, &instruction(Some(50), None, FitMode::Cover))
            .unwrap();
        assert_eq!(Jpeg::from_bytes(out.clone()).unwrap().exif(), Some(exif));

        let mut stripped = instruction(Some(50), None, FitMode::Cover);
        stripped.keep_metadata = false;
        let out = codec.resize(&source, &stripped).unwrap();
        assert_eq!(Jpeg::from_bytes(out).unwrap().exif(), None);
    }

    #[test]
    fn transparent_pixels_become_black() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 0]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        let out = MozJpegCodec::new()
            .resize(&buffer, &instruction(Some(10), None, FitMode::Fill))
            .unwrap();
        let px = *decoded(&out).to_rgb8().get_pixel(5, 5);
        assert!(px.0.iter().all(|&c| c < 16), "{px:?}");
    }

    #[test]
    fn garbage_input_is_a_decode_error() {
        let err = MozJpegCodec::new()
            .resize(
                b"definitely not an image",
                &instruction(Some(10), None, FitMode::Cover),
            )
            .unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }
}
