// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — the compositor tracks what the terminal
// currently shows and calls these only when something must change. This
// module just knows the byte-level encoding of every terminal command we
// need.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).

use std::io::{self, Write};

use crate::color::Color;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Home the cursor to the top-left corner (CUP with no parameters).
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Clear from the cursor to the end of the current line (EL 0).
///
/// The compositor ends every row with this instead of clearing the whole
/// screen up front, so a frame never shows a half-erased display.
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Reset all SGR attributes to terminal defaults (SGR 0).
///
/// This clears **everything**: inverse video, colors, the lot. Callers that
/// track a "current color" must invalidate it after this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[m")
}

/// Enable inverse video (SGR 7) — used for the status bar and for making
/// control bytes visible.
#[inline]
pub fn inverse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[7m")
}

// ─── Foreground Color ────────────────────────────────────────────────────────

/// Set the foreground (text) color.
///
/// Uses compact SGR codes for the standard palette (30–37, 90–97) and
/// SGR 39 for the terminal default.
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    match color {
        Color::Default => w.write_all(b"\x1b[39m"),
        Color::Ansi(idx) => {
            if idx < 8 {
                write!(w, "\x1b[{}m", 30 + u16::from(idx))
            } else {
                write!(w, "\x1b[{}m", 82 + u16::from(idx))
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn capture(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cursor_to_is_one_indexed() {
        assert_eq!(capture(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(capture(|w| cursor_to(w, 9, 4)), "\x1b[5;10H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(capture(cursor_hide), "\x1b[?25l");
        assert_eq!(capture(cursor_show), "\x1b[?25h");
    }

    #[test]
    fn screen_sequences() {
        assert_eq!(capture(cursor_home), "\x1b[H");
        assert_eq!(capture(clear_screen), "\x1b[2J");
        assert_eq!(capture(clear_line), "\x1b[K");
    }

    #[test]
    fn attribute_sequences() {
        assert_eq!(capture(reset), "\x1b[m");
        assert_eq!(capture(inverse), "\x1b[7m");
    }

    #[test]
    fn fg_default_resets_color_only() {
        assert_eq!(capture(|w| fg(w, Color::Default)), "\x1b[39m");
    }

    #[test]
    fn fg_standard_palette() {
        assert_eq!(capture(|w| fg(w, Color::Ansi(1))), "\x1b[31m");
        assert_eq!(capture(|w| fg(w, Color::Ansi(7))), "\x1b[37m");
    }

    #[test]
    fn fg_bright_palette() {
        assert_eq!(capture(|w| fg(w, Color::Ansi(8))), "\x1b[90m");
        assert_eq!(capture(|w| fg(w, Color::Ansi(15))), "\x1b[97m");
    }
}
