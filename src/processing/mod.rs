//! # Processing Module
//!
//! The image-to-message encoding pipeline, one stage per module:
//!
//! 1. [`resize`]: scale an arbitrary image onto the 128×128 grid
//! 2. [`binarize`]: luminance threshold into a [`Bitmap`]
//! 3. [`rle`]: run-length text codec
//! 4. [`chunk`]: two-chunk split and reassembly
//! 5. [`frame`]: text-mode terminator
//!
//! [`pipeline`] strings the picture stages together.

pub mod binarize;
pub mod bitmap;
pub mod chunk;
pub mod frame;
pub mod pipeline;
pub mod resize;
pub mod rle;

// Re-export commonly used types for convenience
pub use bitmap::{Bitmap, GRID_CELLS, GRID_SIDE, Symbol};
pub use pipeline::{EncodedPicture, PicturePipeline, decode_grid, decode_picture, encode_picture};
pub use resize::GridResizer;
pub use rle::RunLengthToken;
