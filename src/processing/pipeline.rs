//! End-to-end picture encoding: resize → binarize → run-length encode.
//!
//! The whole payload is produced before anything is chunked, so callers can
//! rely on an `Ok` result meaning every chunk is available.

use std::time::Instant;

use image::DynamicImage;
use mbox_scale::presets::AspectMode;
use tracing::debug;

use super::binarize::binarize;
use super::bitmap::{Bitmap, GRID_CELLS, GRID_SIDE};
use super::chunk;
use super::resize::GridResizer;
use super::rle;
use crate::error::{PipelineError, PipelineResult};

/// Output of a successful picture encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPicture {
    pub bitmap: Bitmap,
    /// Canonical run-length text
    pub payload: String,
}

impl EncodedPicture {
    /// Two-chunk wire form: `(first half + "$", second half)`.
    pub fn chunks(&self) -> (String, String) {
        chunk::split(&self.payload)
    }

    /// Single-message wire form.
    pub fn single(&self) -> String {
        chunk::join_single(&self.payload)
    }

    /// Characters of payload per bitmap symbol (lower is better).
    pub fn compression_ratio(&self) -> f64 {
        self.payload.len() as f64 / self.bitmap.len().max(1) as f64
    }
}

/// Reusable picture encoder.
pub struct PicturePipeline {
    resizer: GridResizer,
}

impl PicturePipeline {
    pub fn new(aspect: AspectMode) -> PipelineResult<Self> {
        Ok(Self {
            resizer: GridResizer::new(GRID_SIDE, aspect)?,
        })
    }

    /// Encode `image` into its run-length payload.
    pub fn encode(&mut self, image: &DynamicImage) -> PipelineResult<EncodedPicture> {
        let started = Instant::now();
        let resized = self.resizer.resize(image)?;
        let bitmap = binarize(&resized)?;
        let payload = rle::encode(&bitmap);

        debug!(
            ones = bitmap.count_ones(),
            payload_len = payload.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "encoded picture"
        );
        Ok(EncodedPicture { bitmap, payload })
    }
}

/// Encode with the wire-compatible stretch mapping.
pub fn encode_picture(image: &DynamicImage) -> PipelineResult<EncodedPicture> {
    PicturePipeline::new(AspectMode::Distort)?.encode(image)
}

/// Decode a run-length payload that must describe exactly one full grid.
pub fn decode_grid(payload: &str) -> PipelineResult<Bitmap> {
    let bitmap = rle::decode_bounded(payload, GRID_CELLS)?;
    if !bitmap.is_full_grid() {
        return Err(PipelineError::encoding(
            payload.chars().take(32).collect::<String>(),
            format!("payload covers {} of {} symbols", bitmap.len(), GRID_CELLS),
        )
        .with_operation("decode picture"));
    }
    Ok(bitmap)
}

/// Receiver-side inverse of the two-chunk send: reassemble and decode.
pub fn decode_picture(first: &str, second: &str) -> PipelineResult<Bitmap> {
    decode_grid(&chunk::reassemble(first, second)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn black_photo_produces_known_chunks() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(640, 480, Rgba([0, 0, 0, 255])));
        let encoded = encode_picture(&img).unwrap();

        assert_eq!(encoded.payload, "0:16384,");
        assert_eq!(encoded.chunks(), ("0:16$".to_string(), "384,".to_string()));
        assert_eq!(decode_picture("0:16$", "384,").unwrap(), encoded.bitmap);
    }

    #[test]
    fn decode_grid_rejects_short_payloads() {
        assert!(decode_grid("0:100,").is_err());
        assert!(decode_grid("0:16383,1:1,").is_ok());
    }

    #[test]
    fn invalid_image_yields_no_payload() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert_eq!(encode_picture(&img).unwrap_err().category(), "invalid_image");
    }

    #[test]
    fn compression_ratio_for_uniform_picture() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])));
        let encoded = encode_picture(&img).unwrap();
        assert!(encoded.compression_ratio() < 0.001);
    }
}
