// SPDX-License-Identifier: MIT
//! # mbox-scale: Fixed-Grid Scaling for Monochrome Payloads
//!
//! This crate maps arbitrary RGBA images onto the small square grid that
//! message payloads are built from.
//!
//! ## Key Components
//!
//! - [`presets`]: Scaling plan computation and CLI-facing fit presets
//! - [`cpu`]: CPU-based scaling implementation using SIMD acceleration
//!
//! ## Usage Example
//!
//! ```rust
//! use mbox_scale::{cpu::scale_rgba_cpu, presets::{build_plan, AspectMode, Size}};
//!
//! let input = Size { w: 4, h: 2 };
//! let rgba = vec![255u8; 4 * 2 * 4];
//! let plan = build_plan(input, 128, AspectMode::Distort);
//!
//! let mut resizer = fast_image_resize::Resizer::new();
//! let mut output = vec![0u8; plan.out.area() * 4];
//! scale_rgba_cpu(&mut resizer, &rgba, input, &plan, &mut output).unwrap();
//! assert_eq!(output.len(), 128 * 128 * 4);
//! ```

pub mod cpu;
pub mod presets;
