//! Scaling of caller images onto the fixed picture grid.

use fast_image_resize::Resizer;
use image::{DynamicImage, GenericImageView, RgbaImage};
use mbox_scale::cpu::scale_rgba_cpu;
use mbox_scale::presets::{AspectMode, Size, build_plan};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Reusable scaler that maps any image onto a `side × side` RGBA canvas.
///
/// Holds the SIMD resizer so repeated sends do not rebuild its scratch
/// buffers.
pub struct GridResizer {
    resizer: Resizer,
    side: u32,
    aspect: AspectMode,
}

impl GridResizer {
    /// Create a resizer for the given side and aspect handling.
    ///
    /// A side of zero is rejected here rather than at first use.
    pub fn new(side: u32, aspect: AspectMode) -> PipelineResult<Self> {
        if side == 0 {
            return Err(PipelineError::config(
                "grid_side",
                "0",
                "target size must be positive",
            ));
        }
        Ok(Self {
            resizer: Resizer::new(),
            side,
            aspect,
        })
    }

    /// Scale `image` to exactly `side × side` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidImage`] if the image has a zero width or
    /// height.
    pub fn resize(&mut self, image: &DynamicImage) -> PipelineResult<RgbaImage> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(PipelineError::invalid_image(format!(
                "image is {}x{}, both sides must be non-zero",
                w, h
            ))
            .with_operation("resize")
            .with_recovery_suggestion("choose a photo with visible content"));
        }

        let input = Size { w, h };
        let plan = build_plan(input, self.side, self.aspect);
        debug!(
            input_w = w,
            input_h = h,
            side = self.side,
            letterboxed = plan.dst_roi.is_some(),
            "resizing picture"
        );

        let src = image.to_rgba8();
        let mut out = vec![0u8; plan.out.area() * 4];
        scale_rgba_cpu(&mut self.resizer, src.as_raw(), input, &plan, &mut out)
            .map_err(|e| PipelineError::from(e).with_operation("resize"))?;

        RgbaImage::from_raw(plan.out.w, plan.out.h, out).ok_or_else(|| {
            PipelineError::invalid_image("scaled buffer does not match grid size")
                .with_operation("resize")
        })
    }
}

/// Scale `image` to `target × target` pixels, ignoring its aspect ratio.
pub fn resize(image: &DynamicImage, target: u32) -> PipelineResult<RgbaImage> {
    GridResizer::new(target, AspectMode::Distort)?.resize(image)
}
