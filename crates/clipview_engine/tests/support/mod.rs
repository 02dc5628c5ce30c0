#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Once;

use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};

pub const BLACK: Rgba<u8> = Rgba([4, 4, 4, 255]);
pub const BRIGHT: Rgba<u8> = Rgba([210, 190, 170, 255]);

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(clipview_logging::initialize_for_tests);
}

/// `width × height` frame with `top` and `bottom` near-black rows.
pub fn letterboxed(width: u32, height: u32, top: u32, bottom: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        if y < top || y >= height - bottom {
            BLACK
        } else {
            BRIGHT
        }
    })
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
        .expect("encode png");
    out
}
