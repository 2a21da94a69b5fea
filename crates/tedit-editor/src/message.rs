//! Status message — transient text for the message bar.
//!
//! A message is set with a timestamp and displayed until a fixed TTL
//! elapses. The text is truncated to 79 bytes on a character boundary;
//! the message bar is one terminal row and long diagnostics belong in a
//! pager, not here.

use std::time::{Duration, Instant};

/// How long a message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Maximum stored message length in bytes.
const MAX_LEN: usize = 79;

/// The status-bar message and its timestamp.
#[derive(Debug, Default)]
pub struct StatusMessage {
    text: String,
    set_at: Option<Instant>,
}

impl StatusMessage {
    /// An empty message (nothing displayed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message text, truncated to 79 bytes, and stamp it.
    pub fn set(&mut self, text: impl Into<String>) {
        let mut text = text.into();
        if text.len() > MAX_LEN {
            let mut cut = MAX_LEN;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
        }
        self.text = text;
        self.set_at = Some(Instant::now());
    }

    /// Clear the message immediately.
    pub fn clear(&mut self) {
        self.text.clear();
        self.set_at = None;
    }

    /// The message text while it is still within its TTL, else `None`.
    #[must_use]
    pub fn visible(&self) -> Option<&str> {
        let set_at = self.set_at?;
        if self.text.is_empty() || set_at.elapsed() >= MESSAGE_TTL {
            return None;
        }
        Some(&self.text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_message_is_visible() {
        let mut msg = StatusMessage::new();
        msg.set("hello");
        assert_eq!(msg.visible(), Some("hello"));
    }

    #[test]
    fn unset_message_is_hidden() {
        let msg = StatusMessage::new();
        assert_eq!(msg.visible(), None);
    }

    #[test]
    fn cleared_message_is_hidden() {
        let mut msg = StatusMessage::new();
        msg.set("hello");
        msg.clear();
        assert_eq!(msg.visible(), None);
    }

    #[test]
    fn empty_set_is_hidden() {
        let mut msg = StatusMessage::new();
        msg.set("");
        assert_eq!(msg.visible(), None);
    }

    #[test]
    fn long_message_truncates_to_79_bytes() {
        let mut msg = StatusMessage::new();
        msg.set("x".repeat(200));
        assert_eq!(msg.visible().unwrap().len(), 79);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut msg = StatusMessage::new();
        // 'é' is 2 bytes; 40 of them span byte 78..80 at the cut point.
        msg.set("é".repeat(40));
        let shown = msg.visible().unwrap();
        assert!(shown.len() <= 79);
        assert_eq!(shown, "é".repeat(39));
    }
}
