//! Shared helpers for the messagebox integration tests.
#![allow(dead_code)]

/// Synthetic test images
pub mod test_images {
    use image::{DynamicImage, Rgba, RgbaImage};

    pub const BLACK: [u8; 4] = [0, 0, 0, 255];
    pub const WHITE: [u8; 4] = [255, 255, 255, 255];

    /// Typical phone photo and webcam sizes
    pub const PHOTO_SIZES: &[(u32, u32)] = &[(640, 480), (1920, 1080), (480, 640), (128, 128), (37, 5)];

    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    /// Black and white squares of `cell` pixels, black at the origin.
    pub fn checkerboard(width: u32, height: u32, cell: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgba(BLACK)
            } else {
                Rgba(WHITE)
            }
        })
    }

    /// Gray ramp from black on the left to white on the right.
    pub fn horizontal_gradient(width: u32, height: u32) -> DynamicImage {
        let span = (width.max(2) - 1) as f32;
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
            let v = (x as f32 / span * 255.0).round() as u8;
            Rgba([v, v, v, 255])
        }))
    }
}

/// Random bitmaps for round-trip checks
pub mod test_bitmaps {
    use messagebox::{Bitmap, GRID_CELLS, Symbol};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Full grid where each cell is `One` with probability `p_one`.
    pub fn random_grid(seed: u64, p_one: f64) -> Bitmap {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..GRID_CELLS)
            .map(|_| {
                if rng.random_bool(p_one) {
                    Symbol::One
                } else {
                    Symbol::Zero
                }
            })
            .collect()
    }

    /// Full grid with long runs, closer to a real thresholded photo.
    pub fn blocky_grid(seed: u64) -> Bitmap {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut symbols = Vec::with_capacity(GRID_CELLS);
        let mut current = Symbol::Zero;
        while symbols.len() < GRID_CELLS {
            let run = rng.random_range(1..=400).min(GRID_CELLS - symbols.len());
            symbols.extend(std::iter::repeat_n(current, run));
            current = if current == Symbol::Zero {
                Symbol::One
            } else {
                Symbol::Zero
            };
        }
        Bitmap::new(symbols)
    }
}
