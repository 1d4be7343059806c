// SPDX-License-Identifier: MIT
//! # Grid Scaling Plans
//!
//! This module computes how an arbitrary source image is mapped onto the fixed
//! square grid used by message payloads.
//!
//! ## Design Philosophy
//!
//! Planning is split from execution:
//! 1. **AspectMode**: How source proportions are treated (stretched or letterboxed)
//! 2. **ScalePlan**: The computed output canvas and the region scaled content lands in
//! 3. **FitPreset**: CLI-facing names for the supported aspect modes
//!
//! The default is [`AspectMode::Distort`]: both sides are forced to the grid side
//! and the aspect ratio is not preserved. Receivers expect exactly this mapping,
//! so letterboxing is only ever used when a caller asks for it.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    /// Square size with the given side.
    pub const fn square(side: u32) -> Self {
        Self { w: side, h: side }
    }

    /// Number of pixels covered by this size.
    pub fn area(self) -> usize {
        self.w as usize * self.h as usize
    }

    /// True if either side is zero.
    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Defines how aspect ratio differences are handled during scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AspectMode {
    /// Stretch/squeeze the image to exactly fill the grid.
    /// Distorts the aspect ratio; this is the wire-compatible behaviour.
    Distort,
    /// Scale to fit inside the grid preserving aspect ratio and fill the
    /// remaining border with a solid RGBA colour.
    Pad { bg_rgba: [u8; 4] },
}

impl Default for AspectMode {
    fn default() -> Self {
        Self::Distort
    }
}

/// Complete scaling plan computed from input parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalePlan {
    /// Original input dimensions
    pub input: Size,
    /// Aspect ratio handling strategy
    pub aspect: AspectMode,
    /// Final output canvas, always `side × side`
    pub out: Size,
    /// If padding is used, the sub-rectangle where scaled content is placed.
    /// Format: (x, y, width, height) in output coordinate space.
    pub dst_roi: Option<(u32, u32, u32, u32)>,
}

/// Compute a scaling plan that maps `input` onto a `side × side` canvas.
///
/// # Arguments
/// * `input` - Source image dimensions (both sides must be non-zero)
/// * `side` - Grid side length in pixels
/// * `aspect` - How to handle aspect ratio differences
///
/// # Performance
/// O(1) computation with minimal floating-point operations
pub fn build_plan(input: Size, side: u32, aspect: AspectMode) -> ScalePlan {
    let out = Size::square(side);
    match aspect {
        AspectMode::Distort => ScalePlan {
            input,
            aspect,
            out,
            dst_roi: None,
        },
        AspectMode::Pad { .. } => {
            let (rw, rh) = fit_within(input, side);
            let x = (out.w - rw) / 2;
            let y = (out.h - rh) / 2;
            let dst_roi = if (rw, rh) == (out.w, out.h) {
                None
            } else {
                Some((x, y, rw, rh))
            };
            ScalePlan {
                input,
                aspect,
                out,
                dst_roi,
            }
        }
    }
}

/// Fit the image inside a `side × side` box preserving aspect ratio.
///
/// Unlike token-saving downscales this may upscale: small photos still have to
/// cover the grid along their longest side.
fn fit_within(input: Size, side: u32) -> (u32, u32) {
    let (w, h) = (input.w.max(1) as f64, input.h.max(1) as f64);
    let s = side as f64 / w.max(h);
    (
        ((w * s).round() as u32).clamp(1, side),
        ((h * s).round() as u32).clamp(1, side),
    )
}

/// Named aspect handling choices exposed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum FitPreset {
    /// Force both sides to the grid side (wire-compatible default)
    #[clap(name = "stretch")]
    Stretch,
    /// Preserve aspect ratio, pad with white
    #[clap(name = "letterbox-white")]
    LetterboxWhite,
    /// Preserve aspect ratio, pad with black
    #[clap(name = "letterbox-black")]
    LetterboxBlack,
}

impl FitPreset {
    /// Convert the preset to the corresponding AspectMode.
    pub fn to_aspect(self) -> AspectMode {
        match self {
            FitPreset::Stretch => AspectMode::Distort,
            FitPreset::LetterboxWhite => AspectMode::Pad {
                bg_rgba: [255, 255, 255, 255],
            },
            FitPreset::LetterboxBlack => AspectMode::Pad {
                bg_rgba: [0, 0, 0, 255],
            },
        }
    }
}
