//! Run-length text codec for bitmaps.
//!
//! Each maximal run of identical symbols becomes one `S:C,` token: the literal
//! symbol, a colon, the decimal run length and a trailing comma. Tokens are
//! concatenated without any other separator.
//!
//! ```text
//! 0000011 -> "0:5,1:2,"
//! ```

use std::fmt;

use super::bitmap::{Bitmap, Symbol};
use crate::error::{PipelineError, PipelineResult};

/// One run of identical symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLengthToken {
    pub symbol: Symbol,
    /// Always at least 1
    pub count: usize,
}

impl fmt::Display for RunLengthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},", self.symbol.as_char(), self.count)
    }
}

/// Group the bitmap into maximal runs, left to right.
pub fn runs(bitmap: &Bitmap) -> Vec<RunLengthToken> {
    let mut tokens: Vec<RunLengthToken> = Vec::new();
    for &symbol in bitmap.symbols() {
        match tokens.last_mut() {
            Some(last) if last.symbol == symbol => last.count += 1,
            _ => tokens.push(RunLengthToken { symbol, count: 1 }),
        }
    }
    tokens
}

/// Encode a bitmap into its canonical run-length string.
///
/// An empty bitmap encodes to the empty string.
pub fn encode(bitmap: &Bitmap) -> String {
    runs(bitmap).iter().map(ToString::to_string).collect()
}

/// Parse a run-length string into its tokens without expanding them.
///
/// # Errors
///
/// [`PipelineError::Encoding`] when the text does not end with `,`, a token is
/// empty or lacks `:`, the symbol is not `0`/`1`, or the count is not a
/// positive decimal integer without leading zeros.
pub fn parse_tokens(encoded: &str) -> PipelineResult<Vec<RunLengthToken>> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }
    let Some(body) = encoded.strip_suffix(',') else {
        let tail = encoded.rsplit(',').next().unwrap_or(encoded);
        return Err(PipelineError::encoding(tail, "last token is not terminated by ','"));
    };

    body.split(',').map(parse_token).collect()
}

fn parse_token(token: &str) -> PipelineResult<RunLengthToken> {
    let (symbol, count) = token
        .split_once(':')
        .ok_or_else(|| PipelineError::encoding(token, "missing ':' separator"))?;

    let symbol = match symbol {
        "0" => Symbol::Zero,
        "1" => Symbol::One,
        _ => return Err(PipelineError::encoding(token, "symbol must be '0' or '1'")),
    };

    // `usize::from_str` also accepts a leading '+', which is not part of the grammar.
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PipelineError::encoding(token, "count is not a decimal number"));
    }
    if count.len() > 1 && count.starts_with('0') {
        return Err(PipelineError::encoding(token, "count has leading zeros"));
    }
    let count: usize = count
        .parse()
        .map_err(|_| PipelineError::encoding(token, "count does not fit in memory"))?;
    if count == 0 {
        return Err(PipelineError::encoding(token, "count must be at least 1"));
    }

    Ok(RunLengthToken { symbol, count })
}

/// Decode a run-length string back into the bitmap it was built from.
pub fn decode(encoded: &str) -> PipelineResult<Bitmap> {
    decode_bounded(encoded, usize::MAX)
}

/// Decode, refusing to expand beyond `max_symbols`.
///
/// Receivers use this with the grid size so a hostile count cannot force a
/// huge allocation.
pub fn decode_bounded(encoded: &str, max_symbols: usize) -> PipelineResult<Bitmap> {
    let tokens = parse_tokens(encoded)?;

    let mut total: usize = 0;
    for token in &tokens {
        total = total
            .checked_add(token.count)
            .filter(|t| *t <= max_symbols)
            .ok_or_else(|| {
                PipelineError::encoding(
                    token.to_string(),
                    format!("decoded length exceeds {} symbols", max_symbols),
                )
            })?;
    }

    let mut symbols = Vec::with_capacity(total);
    for token in tokens {
        symbols.extend(std::iter::repeat_n(token.symbol, token.count));
    }
    Ok(Bitmap::new(symbols))
}
