//! Text-mode framing.
//!
//! Plain messages end with the reserved `$&#` terminator. There is no escape
//! mechanism: a message that already contains the terminator is ambiguous to
//! receivers. Senders can detect that case with [`contains_reserved`].

use super::chunk::CHUNK_MARKER;

/// Terminator appended to every text message.
pub const TERMINATOR: &str = "$&#";

/// Append the terminator to `message`.
pub fn frame(message: &str) -> String {
    let mut framed = String::with_capacity(message.len() + TERMINATOR.len());
    framed.push_str(message);
    framed.push_str(TERMINATOR);
    framed
}

/// Strip the terminator, if present.
pub fn unframe(payload: &str) -> Option<&str> {
    payload.strip_suffix(TERMINATOR)
}

/// True if `message` contains sequences receivers treat as framing.
pub fn contains_reserved(message: &str) -> bool {
    message.contains(TERMINATOR) || message.contains(CHUNK_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_with_terminator() {
        assert_eq!(frame("hello"), "hello$&#");
        assert_eq!(frame(""), "$&#");
    }

    #[test]
    fn unframe_inverts_frame() {
        assert_eq!(unframe(&frame("hi")), Some("hi"));
        assert_eq!(unframe("0:16$"), None);
    }

    #[test]
    fn reserved_sequences_are_detected() {
        assert!(contains_reserved("price: $5"));
        assert!(contains_reserved("a$&#b"));
        assert!(!contains_reserved("hello ❤️"));
    }
}
