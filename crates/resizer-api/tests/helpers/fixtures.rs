//! Image fixtures generated on the fly.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).expect("Failed to encode fixture");
    buf.into_inner()
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(gradient(width, height)), ImageFormat::Jpeg)
}

/// PNG with a fully transparent left half.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 255, 255, 0])
        } else {
            Rgba([200, 40, 40, 255])
        }
    });
    encode(DynamicImage::ImageRgba8(image), ImageFormat::Png)
}

/// Decode a response body and return its dimensions.
pub fn dimensions_of(bytes: &[u8]) -> (u32, u32) {
    let format = image::guess_format(bytes).expect("Unknown image format");
    assert_eq!(format, ImageFormat::Jpeg, "response is not a JPEG");
    let image = image::load_from_memory(bytes).expect("Failed to decode response");
    (image.width(), image.height())
}
