//! Screen — composes one frame of terminal output.
//!
//! The compositor walks the visible window of the document and appends
//! every byte of the frame — escapes and text alike — to an
//! [`OutputBuffer`], which the caller flushes in a single write. A frame
//! is: hide cursor, home, the text rows (clipped to the viewport), the
//! inverse-video status bar, the message bar, then the hardware cursor
//! parked at the editing position and shown again.
//!
//! Escape output is minimized by tracking the color the terminal is
//! currently drawing with: a run of bytes in one highlight class costs
//! one color escape, and rows end with a single reset to the default
//! foreground. Control bytes render as inverse-video placeholder glyphs
//! without disturbing the tracked color.

use std::io::{self, Write};

use tedit_term::ansi;
use tedit_term::color::Color;
use tedit_term::output::OutputBuffer;
use tedit_term::terminal::Size;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::message::StatusMessage;
use crate::row::Row;
use crate::view::Viewport;

/// Banner shown on an empty document.
const WELCOME: &str = concat!("tedit version ", env!("CARGO_PKG_VERSION"));

/// Frame compositor for a fixed terminal size.
///
/// The bottom two terminal rows are reserved for the status bar and the
/// message bar; everything above is text area.
#[derive(Debug, Clone, Copy)]
pub struct Screen {
    text_rows: usize,
    cols: usize,
}

impl Screen {
    /// Create a compositor for the given terminal size.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self {
            text_rows: (size.rows as usize).saturating_sub(2),
            cols: size.cols as usize,
        }
    }

    /// Rows available for document text.
    #[inline]
    #[must_use]
    pub const fn text_rows(&self) -> usize {
        self.text_rows
    }

    /// Terminal width in columns.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Compose one complete frame into `out`.
    ///
    /// The caller is responsible for flushing the buffer to the terminal
    /// in a single write.
    ///
    /// # Errors
    ///
    /// Propagates writer errors; writing into an [`OutputBuffer`] does
    /// not fail in practice.
    pub fn render(
        &self,
        out: &mut OutputBuffer,
        doc: &Document,
        cursor: &Cursor,
        view: &Viewport,
        message: &StatusMessage,
    ) -> io::Result<()> {
        ansi::cursor_hide(out)?;
        ansi::cursor_home(out)?;

        self.draw_rows(out, doc, view)?;
        self.draw_status_bar(out, doc, cursor)?;
        self.draw_message_bar(out, message)?;

        #[allow(clippy::cast_possible_truncation)]
        ansi::cursor_to(
            out,
            cursor.rx.saturating_sub(view.left) as u16,
            cursor.y.saturating_sub(view.top) as u16,
        )?;
        ansi::cursor_show(out)?;
        Ok(())
    }

    // -- Text rows ----------------------------------------------------------

    fn draw_rows(&self, out: &mut OutputBuffer, doc: &Document, view: &Viewport) -> io::Result<()> {
        for y in 0..self.text_rows {
            let file_row = y + view.top;
            if let Some(row) = doc.row(file_row) {
                self.draw_row(out, row, view.left)?;
            } else if doc.is_empty() && y == self.text_rows / 3 {
                self.draw_welcome(out)?;
            } else {
                out.push(b'~');
            }
            ansi::clear_line(out)?;
            out.write_all(b"\r\n")?;
        }
        Ok(())
    }

    /// The visible slice of one row, with minimal color escapes.
    fn draw_row(&self, out: &mut OutputBuffer, row: &Row, left: usize) -> io::Result<()> {
        let render = row.render();
        let hl = row.highlights();
        let start = left.min(render.len());
        let end = (left + self.cols).min(render.len());

        // The color the terminal is currently drawing with; `None` means
        // the default foreground.
        let mut current: Option<Color> = None;

        for i in start..end {
            let byte = render[i];
            if byte.is_ascii_control() {
                let glyph = if byte <= 26 { b'@' + byte } else { b'?' };
                ansi::inverse(out)?;
                out.push(glyph);
                ansi::reset(out)?;
                // The reset cleared the color; restore it for the run.
                if let Some(color) = current {
                    ansi::fg(out, color)?;
                }
            } else {
                match hl[i].color() {
                    Color::Default => {
                        if current.is_some() {
                            ansi::fg(out, Color::Default)?;
                            current = None;
                        }
                        out.push(byte);
                    }
                    color => {
                        if current != Some(color) {
                            ansi::fg(out, color)?;
                            current = Some(color);
                        }
                        out.push(byte);
                    }
                }
            }
        }

        ansi::fg(out, Color::Default)
    }

    fn draw_welcome(&self, out: &mut OutputBuffer) -> io::Result<()> {
        let banner = &WELCOME.as_bytes()[..WELCOME.len().min(self.cols)];
        let mut padding = (self.cols - banner.len()) / 2;
        if padding > 0 {
            out.push(b'~');
            padding -= 1;
        }
        for _ in 0..padding {
            out.push(b' ');
        }
        out.write_all(banner)
    }

    // -- Status and message bars --------------------------------------------

    fn draw_status_bar(
        &self,
        out: &mut OutputBuffer,
        doc: &Document,
        cursor: &Cursor,
    ) -> io::Result<()> {
        ansi::inverse(out)?;

        let name = doc
            .filename()
            .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string());
        let modified = if doc.is_dirty() { "(modified)" } else { "" };
        let left = format!("{name:.20} - {} lines {modified}", doc.len());
        let right = format!(
            "{} | {}/{}",
            doc.syntax().map_or("no ft", |s| s.name),
            cursor.y + 1,
            doc.len()
        );

        let mut left = left.into_bytes();
        left.truncate(self.cols);
        out.write_all(&left)?;

        let right = right.as_bytes();
        let mut written = left.len();
        while written < self.cols {
            if self.cols - written == right.len() {
                out.write_all(right)?;
                break;
            }
            out.push(b' ');
            written += 1;
        }

        ansi::reset(out)?;
        out.write_all(b"\r\n")
    }

    fn draw_message_bar(&self, out: &mut OutputBuffer, message: &StatusMessage) -> io::Result<()> {
        ansi::clear_line(out)?;
        if let Some(text) = message.visible() {
            let bytes = text.as_bytes();
            out.write_all(&bytes[..bytes.len().min(self.cols)])?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
