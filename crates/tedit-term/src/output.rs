// SPDX-License-Identifier: MIT
//
// Output buffering — one frame, one write.
//
// The compositor appends every byte of a frame (escapes and text alike)
// to an `OutputBuffer`, and the whole thing goes out in a single write()
// syscall. Writing escape-by-escape makes the terminal repaint mid-frame
// and the screen tears; buffering eliminates that and the per-write
// overhead in one move.

use std::io::{self, Write};

/// A byte buffer that accumulates ANSI output for a single `write()` syscall.
///
/// Default capacity: 16 KB — enough for most frames without reallocation.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append a single byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&self.buf)?;
            stdout.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing via flush_stdout() / flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_empty() {
        let out = OutputBuffer::new();
        assert!(out.is_empty());
        assert_eq!(out.len(), 0);
    }

    #[test]
    fn write_accumulates() {
        let mut out = OutputBuffer::new();
        out.write_all(b"\x1b[H").unwrap();
        out.write_all(b"hello").unwrap();
        out.push(b'!');
        assert_eq!(out.as_bytes(), b"\x1b[Hhello!");
    }

    #[test]
    fn flush_is_noop_on_write_impl() {
        let mut out = OutputBuffer::new();
        out.write_all(b"x").unwrap();
        out.flush().unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn flush_to_drains_into_writer() {
        let mut out = OutputBuffer::new();
        out.write_all(b"frame").unwrap();

        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"frame");
        assert!(out.is_empty());
    }

    #[test]
    fn flush_to_empty_writes_nothing() {
        let mut out = OutputBuffer::new();
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut out = OutputBuffer::new();
        out.write_all(&[b'x'; 1000]).unwrap();
        let cap = out.buf.capacity();
        out.clear();
        assert!(out.is_empty());
        assert_eq!(out.buf.capacity(), cap);
    }
}
