//! Small real images for tests

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use super::ImageAttachment;

/// An 8x8 gradient encoded as `format`
pub fn encoded(format: ImageFormat) -> Vec<u8> {
    let pixels = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 32) as u8, (y * 32) as u8, 128]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode sample image");
    bytes
}

pub fn jpeg() -> Vec<u8> {
    encoded(ImageFormat::Jpeg)
}

pub fn jpeg_attachment() -> ImageAttachment {
    ImageAttachment::from_bytes(jpeg()).expect("sample jpeg decodes")
}
