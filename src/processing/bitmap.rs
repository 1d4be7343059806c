//! Binary symbol grids produced by thresholding.

use std::fmt;
use std::str::FromStr;

use image::{GrayImage, Luma};

use crate::error::{PipelineError, PipelineResult};

/// Side length of the square grid every picture is reduced to.
pub const GRID_SIDE: u32 = 128;

/// Number of symbols in a full grid bitmap.
pub const GRID_CELLS: usize = (GRID_SIDE as usize) * (GRID_SIDE as usize);

/// One cell of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Dark pixel, rendered as `0`
    Zero,
    /// Bright pixel, rendered as `1`
    One,
}

impl Symbol {
    /// Literal character used on the wire.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Zero => '0',
            Symbol::One => '1',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Symbol::Zero),
            '1' => Some(Symbol::One),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Row-major sequence of symbols (y outer, x inner).
///
/// Bitmaps coming out of the binarizer always hold exactly [`GRID_CELLS`]
/// symbols. Decoded bitmaps may have any length; use [`Bitmap::is_full_grid`]
/// before treating one as a picture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    symbols: Vec<Symbol>,
}

impl Bitmap {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    /// A full grid filled with one symbol.
    pub fn filled(symbol: Symbol) -> Self {
        Self::new(vec![symbol; GRID_CELLS])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// True when the bitmap covers exactly one 128×128 grid.
    pub fn is_full_grid(&self) -> bool {
        self.symbols.len() == GRID_CELLS
    }

    pub fn count_ones(&self) -> usize {
        self.symbols.iter().filter(|s| **s == Symbol::One).count()
    }

    /// Symbol at grid coordinate `(x, y)`, if the bitmap is a full grid.
    pub fn get(&self, x: u32, y: u32) -> Option<Symbol> {
        if !self.is_full_grid() || x >= GRID_SIDE || y >= GRID_SIDE {
            return None;
        }
        self.symbols
            .get(y as usize * GRID_SIDE as usize + x as usize)
            .copied()
    }

    /// Render a full grid as a black/white 8-bit image (`1` → 255, `0` → 0).
    pub fn to_gray_image(&self) -> PipelineResult<GrayImage> {
        self.require_full_grid("render bitmap")?;
        Ok(GrayImage::from_fn(GRID_SIDE, GRID_SIDE, |x, y| {
            match self.symbols[y as usize * GRID_SIDE as usize + x as usize] {
                Symbol::One => Luma([255u8]),
                Symbol::Zero => Luma([0u8]),
            }
        }))
    }

    /// Terminal preview: `#` for bright cells, `.` for dark ones, one line per row.
    pub fn to_ascii(&self) -> PipelineResult<String> {
        self.require_full_grid("preview bitmap")?;
        let mut out = String::with_capacity(GRID_CELLS + GRID_SIDE as usize);
        for row in self.symbols.chunks(GRID_SIDE as usize) {
            out.extend(row.iter().map(|s| match s {
                Symbol::One => '#',
                Symbol::Zero => '.',
            }));
            out.push('\n');
        }
        Ok(out)
    }

    fn require_full_grid(&self, operation: &str) -> PipelineResult<()> {
        if self.is_full_grid() {
            return Ok(());
        }
        Err(PipelineError::invalid_image(format!(
            "bitmap holds {} symbols, expected {}",
            self.len(),
            GRID_CELLS
        ))
        .with_operation(operation))
    }
}

impl FromIterator<Symbol> for Bitmap {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Writes the flat `0`/`1` string form.
impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.symbols {
            write!(f, "{}", s.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Bitmap {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(i, c)| {
                Symbol::from_char(c).ok_or_else(|| {
                    PipelineError::encoding(c.to_string(), format!("invalid symbol at offset {}", i))
                })
            })
            .collect::<PipelineResult<Vec<_>>>()
            .map(Bitmap::new)
    }
}
