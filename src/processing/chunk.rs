//! Splitting encoded payloads into transport chunks.
//!
//! A picture payload is sent as two messages. The first half carries a
//! trailing `$` marker, the second half is sent bare:
//!
//! ```text
//! "0:16384,"  ->  "0:16$", "384,"
//! ```
//!
//! `$` never occurs in run-length text, so receivers can tell the halves apart.
//! Offsets are counted in characters, so arbitrary text splits on a valid
//! UTF-8 boundary.

use crate::error::{PipelineError, PipelineResult};

/// Boundary marker appended to the first chunk.
pub const CHUNK_MARKER: char = '$';

/// Byte offset of the `n`th character of `s` (or `s.len()` past the end).
fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// Split `payload` at `floor(len / 2)` characters and mark the first half.
///
/// `split("")` yields `("$", "")`.
pub fn split(payload: &str) -> (String, String) {
    let half = payload.chars().count() / 2;
    let (head, tail) = payload.split_at(char_offset(payload, half));

    let mut first = String::with_capacity(head.len() + 1);
    first.push_str(head);
    first.push(CHUNK_MARKER);
    (first, tail.to_string())
}

/// Strip the marker from `first` and concatenate `second`.
///
/// # Errors
///
/// [`PipelineError::Encoding`] when `first` does not end with the marker.
pub fn reassemble(first: &str, second: &str) -> PipelineResult<String> {
    let head = first.strip_suffix(CHUNK_MARKER).ok_or_else(|| {
        PipelineError::encoding(first, "first chunk does not end with '$'")
            .with_operation("reassemble")
    })?;
    let mut payload = String::with_capacity(head.len() + second.len());
    payload.push_str(head);
    payload.push_str(second);
    Ok(payload)
}

/// Single-message framing: both halves in one publish, marker in between.
pub fn join_single(payload: &str) -> String {
    let (first, second) = split(payload);
    first + &second
}

/// Undo [`join_single`].
pub fn split_single(message: &str) -> PipelineResult<String> {
    let (first, second) = message.split_once(CHUNK_MARKER).ok_or_else(|| {
        PipelineError::encoding(message, "single-message picture has no '$' marker")
            .with_operation("reassemble")
    })?;
    Ok(format!("{}{}", first, second))
}
