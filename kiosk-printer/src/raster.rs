//! Image to 1-bit raster conversion
//!
//! Converts an arbitrary image into the packed monochrome raster expected
//! by GS v 0: fixed dot width, 8 pixels per byte, MSB first.

use crate::error::{PrintError, PrintResult};
use image::DynamicImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Mild sharpening kernel applied before thresholding.
///
/// Coefficients sum to 1 so flat areas are unchanged; edges get a
/// contrast boost that compensates for thermal print-head dot gain.
const SHARPEN_KERNEL: [f32; 9] = [
    -0.125, -0.125, -0.125, //
    -0.125, 2.0, -0.125, //
    -0.125, -0.125, -0.125,
];

/// Raster encoding options
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Target printer dot width (58mm heads are typically 384 dots)
    pub dot_width: u32,
    /// Binarization threshold: luma below this prints as ink
    pub threshold: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            dot_width: 384,
            threshold: 128,
        }
    }
}

/// A packed 1-bit-per-pixel raster, one bit per dot, rows padded to bytes
#[derive(Debug, Clone)]
pub struct RasterBitmap {
    /// Packed pixel data, `width_bytes * height` bytes
    pub bytes: Vec<u8>,
    /// Row stride in bytes (`ceil(dot_width / 8)`)
    pub width_bytes: u16,
    /// Height in dot rows
    pub height: u16,
}

/// Encode an image into a packed raster at the printer's dot width
///
/// Steps: resize to `dot_width` preserving aspect ratio, grayscale,
/// sharpen, binarize at `threshold`, pack bits MSB-first.
pub fn encode_raster(img: &DynamicImage, opts: &RasterOptions) -> PrintResult<RasterBitmap> {
    if opts.dot_width == 0 {
        return Err(PrintError::InvalidConfig("dot width must be non-zero".into()));
    }

    let (w, h) = (img.width(), img.height());
    let resized = if w != opts.dot_width {
        let new_h = (h as f64 * opts.dot_width as f64 / w as f64).round() as u32;
        img.resize_exact(opts.dot_width, new_h.max(1), FilterType::Lanczos3)
    } else {
        img.clone()
    };

    let gray = resized.to_luma8();
    let sharpened = imageops::filter3x3(&gray, &SHARPEN_KERNEL);

    let width = sharpened.width();
    let height = sharpened.height();
    if height > u16::MAX as u32 {
        return Err(PrintError::Raster(format!("image too tall: {height} rows")));
    }

    let width_bytes = width.div_ceil(8);
    let mut bytes = vec![0u8; (width_bytes * height) as usize];

    for y in 0..height {
        for xb in 0..width_bytes {
            let mut b = 0u8;
            for bit in 0..8 {
                let x = xb * 8 + bit;
                if x < width && sharpened.get_pixel(x, y)[0] < opts.threshold {
                    // Ink dots are set bits; padding past the width stays blank
                    b |= 1 << (7 - bit);
                }
            }
            bytes[(y * width_bytes + xb) as usize] = b;
        }
    }

    debug!(width, height, width_bytes, "raster encoded");

    Ok(RasterBitmap {
        bytes,
        width_bytes: width_bytes as u16,
        height: height as u16,
    })
}
