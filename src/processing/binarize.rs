//! Luminance thresholding of the resized grid.
//!
//! The weights are fixed: receivers decode against exactly this mapping, so
//! the blue weight stays at 0.144 even though the usual luma formula uses
//! 0.114.

use image::RgbaImage;

use super::bitmap::{Bitmap, GRID_CELLS, GRID_SIDE, Symbol};
use crate::error::{PipelineError, PipelineResult};

pub const RED_WEIGHT: f64 = 0.299;
pub const GREEN_WEIGHT: f64 = 0.587;
pub const BLUE_WEIGHT: f64 = 0.144;

/// Luminance at or above this value becomes [`Symbol::One`].
pub const THRESHOLD: f64 = 0.5;

/// Weighted luminance of one pixel with channels normalized to `[0, 1]`.
///
/// Because the weights sum to 1.03, pure white maps slightly above 1.0.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    RED_WEIGHT * (r as f64 / 255.0)
        + GREEN_WEIGHT * (g as f64 / 255.0)
        + BLUE_WEIGHT * (b as f64 / 255.0)
}

pub fn symbol_for_luminance(l: f64) -> Symbol {
    if l >= THRESHOLD {
        Symbol::One
    } else {
        Symbol::Zero
    }
}

/// Threshold a 128×128 image into a row-major bitmap. Alpha is ignored.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidImage`] for any other dimensions.
pub fn binarize(image: &RgbaImage) -> PipelineResult<Bitmap> {
    let (w, h) = image.dimensions();
    if (w, h) != (GRID_SIDE, GRID_SIDE) {
        return Err(PipelineError::invalid_image(format!(
            "expected {}x{} image, got {}x{}",
            GRID_SIDE, GRID_SIDE, w, h
        ))
        .with_operation("binarize")
        .with_recovery_suggestion("resize the image to the grid before thresholding"));
    }

    let mut symbols = Vec::with_capacity(GRID_CELLS);
    for y in 0..GRID_SIDE {
        for x in 0..GRID_SIDE {
            let [r, g, b, _] = image.get_pixel(x, y).0;
            symbols.push(symbol_for_luminance(luminance(r, g, b)));
        }
    }
    Ok(Bitmap::new(symbols))
}
