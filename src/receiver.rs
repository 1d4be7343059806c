//! Receiving side: turn inbound payloads back into messages and pictures.
//!
//! Payloads are told apart by their framing:
//!
//! | Payload | Kind |
//! |---------|------|
//! | ends with `$&#` | text message |
//! | ends with `$` | first half of a picture |
//! | contains `$` elsewhere | single-message picture |
//! | anything else | second half of a picture |
//!
//! A text message that itself contains `$` followed by the terminator is still
//! classified as text; there is no escaping, so such messages are inherently
//! ambiguous.

use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::processing::{Bitmap, chunk, decode_grid, frame};

/// Framing category of one inbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    FirstChunk,
    SingleMessage,
    SecondChunk,
}

pub fn classify(payload: &str) -> PayloadKind {
    if payload.ends_with(frame::TERMINATOR) {
        PayloadKind::Text
    } else if payload.ends_with(chunk::CHUNK_MARKER) {
        PayloadKind::FirstChunk
    } else if payload.contains(chunk::CHUNK_MARKER) {
        PayloadKind::SingleMessage
    } else {
        PayloadKind::SecondChunk
    }
}

/// A fully received message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    Picture(Bitmap),
}

/// Pairs first and second chunks as they arrive.
#[derive(Debug, Default)]
pub struct Reassembler {
    pending: Option<String>,
}

impl Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a first chunk is waiting for its second half.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any half-received picture.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// Feed one payload. Returns `Ok(None)` while a picture is incomplete.
    ///
    /// Text messages do not disturb a pending first chunk. A new first chunk
    /// replaces a pending one, since its second half was evidently lost.
    ///
    /// # Errors
    ///
    /// [`PipelineError::State`] for a second chunk with nothing pending, and
    /// [`PipelineError::Encoding`] when a reassembled payload does not decode
    /// to a full grid.
    pub fn accept(&mut self, payload: &str) -> PipelineResult<Option<Inbound>> {
        let kind = classify(payload);
        debug!(?kind, bytes = payload.len(), "inbound payload");

        match kind {
            PayloadKind::Text => {
                let text = frame::unframe(payload).unwrap_or(payload);
                Ok(Some(Inbound::Text(text.to_string())))
            }
            PayloadKind::FirstChunk => {
                if self.pending.replace(payload.to_string()).is_some() {
                    warn!("first chunk replaced an unpaired first chunk");
                }
                Ok(None)
            }
            PayloadKind::SingleMessage => {
                let joined = chunk::split_single(payload)?;
                Ok(Some(Inbound::Picture(decode_grid(&joined)?)))
            }
            PayloadKind::SecondChunk => {
                let first = self.pending.take().ok_or_else(|| {
                    PipelineError::state(
                        "idle",
                        "accept second chunk",
                        "no first chunk is pending",
                    )
                })?;
                let joined = chunk::reassemble(&first, payload)?;
                Ok(Some(Inbound::Picture(decode_grid(&joined)?)))
            }
        }
    }
}
