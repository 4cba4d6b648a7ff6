//! Picture preparation: resample to the placed size and round the corners.

use deck_core::{Error, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Pixels per inch used when sizing pictures.
pub const PICTURE_DPI: f64 = 96.0;

/// Pixel dimensions for a picture placed at `width_in` x `height_in`.
pub fn pixel_size(width_in: f64, height_in: f64) -> (u32, u32) {
    let px = |inches: f64| ((inches * PICTURE_DPI) as u32).max(1);
    (px(width_in), px(height_in))
}

/// Decode `data`, resize it to exactly `width` x `height`, cut rounded
/// corners with radius `min(width, height) * corner_ratio` and encode as PNG.
pub fn rounded_png(data: &[u8], width: u32, height: u32, corner_ratio: f64) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(data).map_err(|e| Error::ImageError(e.to_string()))?;
    let mut rgba = decoded
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_rgba8();

    let radius = (width.min(height) as f64 * corner_ratio) as u32;
    apply_corner_mask(&mut rgba, radius);

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(rgba)
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| Error::ImageError(e.to_string()))?;
    Ok(out.into_inner())
}

/// Make every pixel outside the rounded rectangle fully transparent.
fn apply_corner_mask(img: &mut RgbaImage, radius: u32) {
    if radius == 0 {
        return;
    }
    let (w, h) = img.dimensions();
    let r = radius as f64;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if !inside_rounded_rect(x, y, w, h, r) {
            pixel[3] = 0;
        }
    }
}

fn inside_rounded_rect(x: u32, y: u32, w: u32, h: u32, r: f64) -> bool {
    let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
    let (w, h) = (w as f64, h as f64);

    let cx = if px < r {
        r
    } else if px > w - r {
        w - r
    } else {
        return true;
    };
    let cy = if py < r {
        r
    } else if py > h - r {
        h - r
    } else {
        return true;
    };

    let (dx, dy) = (px - cx, py - cy);
    dx * dx + dy * dy <= r * r
}
