//! # messagebox
//!
//! Turns a text message or a photo into payloads for a remote
//! publish/subscribe display.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `processing`: The picture encoding pipeline (resize, threshold, run-length, chunk, frame)
//! - `session`: Send actions, the text/picture state machine and its builder
//! - `transport`: The injected publish interface and its implementations
//! - `receiver`: Reassembly of inbound payloads into text and bitmaps
//! - `config`: Configuration loading and validation
//! - `error`: Error types shared by all of the above
//!
//! ## Wire Format
//!
//! | Mode | Payloads |
//! |------|----------|
//! | Text | `<message>$&#` |
//! | Picture | `<first half>$`, then `<second half>` |
//!
//! A picture is scaled to 128×128, thresholded with
//! `0.299 R + 0.587 G + 0.144 B >= 0.5`, and run-length encoded as
//! `S:C,` tokens.
//!
//! ## Example
//!
//! ```rust
//! use image::{DynamicImage, Rgba, RgbaImage};
//! use messagebox::{MemoryTransport, SendSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = MemoryTransport::new();
//! let session = SendSession::builder()
//!     .with_transport(transport.clone())
//!     .build()?;
//!
//! let photo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(640, 480, Rgba([0, 0, 0, 255])));
//! session.send_picture(photo).await?;
//! session.send_text("hi").await?;
//!
//! assert_eq!(transport.payloads(), vec!["0:16$", "384,", "hi$&#"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod processing;
pub mod receiver;
pub mod session;
pub mod transport;

/// Re-export error types for convenience
pub use error::{HasRecoverySuggestion, HasSeverity, PipelineError, PipelineResult};

pub use config::{AppConfig, BrokerConfig, PictureFraming, SendConfig};
pub use processing::{Bitmap, EncodedPicture, GRID_CELLS, GRID_SIDE, Symbol};
pub use receiver::{Inbound, Reassembler};
pub use session::{SendAction, SendMode, SendReport, SendSession};
pub use transport::{HttpBridgeTransport, MemoryTransport, StdoutTransport, Transport};

/// Re-export the fit presets so callers need not depend on `mbox-scale`.
pub use mbox_scale::presets::FitPreset;

/// Load an image from disk for sending.
///
/// # Errors
///
/// [`PipelineError::InvalidImage`] when the file cannot be opened or decoded.
pub fn load_image(path: impl AsRef<std::path::Path>) -> PipelineResult<image::DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|e| {
        PipelineError::invalid_image(e.to_string())
            .with_operation("load image")
            .with_metadata("path", path.display().to_string())
            .with_recovery_suggestion("use a PNG, JPEG, GIF, BMP or WebP file")
    })
}
