//! Letterbox border detection on decoded RGBA buffers.
//!
//! A row is "content" when its mean perceptual luminance, sampled at about
//! [`SAMPLES_PER_ROW`] evenly spaced columns, exceeds [`LUMINANCE_THRESHOLD`].
//! Everything above the first content row and below the last one is border.

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ColorType, DynamicImage, ImageResult, RgbaImage};

/// Mean luminance (0-255) a row must exceed to count as content.
pub const LUMINANCE_THRESHOLD: f64 = 10.0;
/// Smallest surviving band worth cropping to.
pub const MIN_BAND_HEIGHT: u32 = 10;
pub const SAMPLES_PER_ROW: u32 = 50;
pub const JPEG_QUALITY: u8 = 90;

/// Inclusive row range of the image content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Borders {
    pub top: u32,
    pub bottom: u32,
}

impl Borders {
    pub fn band_height(&self) -> u32 {
        self.bottom - self.top + 1
    }
}

/// Column stride giving roughly [`SAMPLES_PER_ROW`] samples whatever the width.
pub fn sample_stride(width: u32) -> u32 {
    (width / SAMPLES_PER_ROW).max(1)
}

/// Mean Rec. 709 luminance of row `y`, sampled every `stride` columns.
pub fn row_luminance(image: &RgbaImage, y: u32, stride: u32) -> f64 {
    let mut sum = 0.0;
    let mut count = 0u32;
    for x in (0..image.width()).step_by(stride.max(1) as usize) {
        let [r, g, b, _] = image.get_pixel(x, y).0;
        sum += 0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b);
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// Find the first and last content rows. With no content row at all the
/// whole image is reported, meaning "nothing to crop".
pub fn detect_borders(image: &RgbaImage) -> Borders {
    let height = image.height();
    let full = Borders {
        top: 0,
        bottom: height.saturating_sub(1),
    };
    if image.width() == 0 || height == 0 {
        return full;
    }

    let stride = sample_stride(image.width());
    let is_content = |y: u32| row_luminance(image, y, stride) > LUMINANCE_THRESHOLD;

    let Some(top) = (0..height).find(|&y| is_content(y)) else {
        return full;
    };
    let bottom = (top..height).rev().find(|&y| is_content(y)).unwrap_or(top);
    Borders { top, bottom }
}

/// Crop only when a border exists and the content band is tall enough.
pub fn should_crop(borders: Borders, height: u32) -> bool {
    let has_border = borders.top > 0 || borders.bottom + 1 < height;
    has_border && borders.band_height() >= MIN_BAND_HEIGHT
}

/// Copy the content rows into a new full-width buffer.
pub fn crop_rows(image: &RgbaImage, borders: Borders) -> RgbaImage {
    imageops::crop_imm(image, 0, borders.top, image.width(), borders.band_height()).to_image()
}

/// Encode as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> ImageResult<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;
    Ok(out)
}
