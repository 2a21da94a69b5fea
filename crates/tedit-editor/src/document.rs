//! Document — the row store with editing operations and file I/O.
//!
//! A `Document` owns the ordered sequence of [`Row`]s, the dirty counter,
//! the filename, and the active syntax definition. Every mutating
//! operation leaves the derived state consistent before it returns: the
//! touched rows are re-rendered, re-highlighted, and renumbered, and the
//! open-comment cascade has run as far as it propagates.
//!
//! # The re-highlight cascade
//!
//! A row's highlighting depends on its own render text and on whether the
//! previous row left a block comment open. Editing row `i` can therefore
//! invalidate row `i + 1`, recursively. [`rehighlight_from`]
//! (Document::rehighlight_from) runs this as a plain loop bounded by the
//! row count — never recursion, so a pathological file with one giant
//! unterminated comment cannot grow the call stack.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cursor::Cursor;
use crate::row::Row;
use crate::syntax::{self, SyntaxDef};

/// An open document: rows, dirty counter, filename, active syntax.
#[derive(Debug, Default)]
pub struct Document {
    rows: Vec<Row>,
    /// Count of content mutations since the last load or save.
    dirty: u64,
    filename: Option<PathBuf>,
    syntax: Option<&'static SyntaxDef>,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// Create an empty document with no filename.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from a string (for tests and scratch buffers).
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.load_bytes(text.as_bytes());
        doc.dirty = 0;
        doc
    }

    /// Load a document from a file.
    ///
    /// A missing file yields an empty document that keeps the filename —
    /// the file is created on the first save. Trailing CR/LF is stripped
    /// from every line. The document starts clean (`dirty == 0`).
    ///
    /// # Errors
    ///
    /// Returns any read error other than the file not existing.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let mut doc = Self::new();
        match fs::read(&path) {
            Ok(data) => doc.load_bytes(&data),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
        doc.set_filename(path);
        doc.dirty = 0;
        Ok(doc)
    }

    /// Split `data` into rows, stripping the trailing CR/LF of each line.
    fn load_bytes(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let mut lines: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();
        if data.ends_with(b"\n") {
            lines.pop();
        }
        for line in lines {
            let mut line = line;
            while let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            self.insert_row(self.rows.len(), line.to_vec());
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// A row by index, or `None` if out of range.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// A mutable row by index, or `None` if out of range.
    ///
    /// Callers that mutate row content must follow up with the document's
    /// own editing operations or re-highlighting; prefer those operations.
    #[inline]
    #[must_use]
    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    /// Count of content mutations since the last load or save.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> u64 {
        self.dirty
    }

    /// Whether there are unsaved changes.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// The file this document is bound to, if any.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// The active syntax definition, if any.
    #[inline]
    #[must_use]
    pub const fn syntax(&self) -> Option<&'static SyntaxDef> {
        self.syntax
    }

    /// Bind the document to a filename, re-select the syntax definition,
    /// and re-highlight every row under the new definition.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.syntax = syntax::select(&path.to_string_lossy());
        self.filename = Some(path);
        self.rehighlight_all();
    }

    // -- Row store ----------------------------------------------------------

    /// Insert a new row at `at` (`0..=len`), shifting and renumbering all
    /// following rows. Out-of-range is a no-op. Marks the document dirty.
    pub fn insert_row(&mut self, at: usize, raw: Vec<u8>) {
        if at > self.rows.len() {
            return;
        }

        // The new row inherits the open-comment state of its predecessor.
        // The row that now follows it last consumed that same inherited
        // state, so the cascade only continues if the new row's own
        // output differs from it.
        let inherited = at > 0 && self.rows[at - 1].opens_comment();

        let mut row = Row::new(raw, at);
        row.rescan(self.syntax, inherited);
        let propagates = row.opens_comment() != inherited;

        self.rows.insert(at, row);
        self.renumber(at);
        self.dirty += 1;

        if propagates {
            self.rehighlight_from(at + 1);
        }
    }

    /// Remove the row at `at`, renumbering all following rows.
    /// Out-of-range is a no-op. Marks the document dirty.
    pub fn remove_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.renumber(at);
        self.dirty += 1;
        // The row now at `at` may inherit a different open-comment state.
        self.rehighlight_from(at);
    }

    /// Restore the `row.index == position` invariant from `from` onward.
    fn renumber(&mut self, from: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.set_index(i);
        }
    }

    // -- Highlighting -------------------------------------------------------

    /// Re-scan row `at`, then cascade forward while the open-comment
    /// output keeps changing. Bounded by the row count; no recursion.
    fn rehighlight_from(&mut self, at: usize) {
        let mut i = at;
        while i < self.rows.len() {
            let starts = i > 0 && self.rows[i - 1].opens_comment();
            let changed = self.rows[i].rescan(self.syntax, starts);
            if !changed {
                break;
            }
            i += 1;
        }
    }

    /// Re-scan every row sequentially (after a syntax definition change).
    fn rehighlight_all(&mut self) {
        for i in 0..self.rows.len() {
            let starts = i > 0 && self.rows[i - 1].opens_comment();
            self.rows[i].rescan(self.syntax, starts);
        }
    }

    // -- Editing operations -------------------------------------------------

    /// Insert one byte at the cursor, advancing it one column.
    ///
    /// Typing on the append line (cursor one past the last row) first
    /// materializes an empty row there.
    pub fn insert_char(&mut self, cursor: &mut Cursor, byte: u8) {
        if cursor.y == self.rows.len() {
            self.insert_row(self.rows.len(), Vec::new());
        }
        self.rows[cursor.y].insert_byte(cursor.x, byte);
        self.dirty += 1;
        self.rehighlight_from(cursor.y);
        cursor.x += 1;
    }

    /// Split the current row at the cursor.
    ///
    /// At column 0 an empty row is inserted above; otherwise the tail of
    /// the current row moves to a new row below. The cursor lands at the
    /// start of the following row.
    pub fn insert_newline(&mut self, cursor: &mut Cursor) {
        if cursor.x == 0 {
            self.insert_row(cursor.y, Vec::new());
        } else {
            let tail = self.rows[cursor.y].split_off(cursor.x);
            self.rehighlight_from(cursor.y);
            self.insert_row(cursor.y + 1, tail);
        }
        cursor.y += 1;
        cursor.x = 0;
    }

    /// Delete the byte before the cursor, or merge into the previous row
    /// when the cursor sits at column 0.
    ///
    /// A no-op at the very start of the document and on the append line
    /// past the last row.
    pub fn delete_char(&mut self, cursor: &mut Cursor) {
        if cursor.y == self.rows.len() {
            return;
        }
        if cursor.x == 0 && cursor.y == 0 {
            return;
        }

        if cursor.x > 0 {
            self.rows[cursor.y].delete_byte(cursor.x - 1);
            self.dirty += 1;
            self.rehighlight_from(cursor.y);
            cursor.x -= 1;
        } else {
            let moved = self.rows[cursor.y].raw().to_vec();
            let prev_len = self.rows[cursor.y - 1].len();
            self.rows[cursor.y - 1].append_bytes(&moved);
            self.dirty += 1;
            self.rehighlight_from(cursor.y - 1);
            self.remove_row(cursor.y);
            cursor.y -= 1;
            cursor.x = prev_len;
        }
    }

    // -- File I/O -----------------------------------------------------------

    /// Serialize the document: every row's raw bytes followed by `\n`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let total: usize = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut buf = Vec::with_capacity(total);
        for row in &self.rows {
            buf.extend_from_slice(row.raw());
            buf.push(b'\n');
        }
        buf
    }

    /// Write the document to its file (truncate-then-write).
    ///
    /// On success the dirty counter resets and the byte count is
    /// returned. On failure the document — including the dirty counter —
    /// is left untouched, so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no filename or the write
    /// fails.
    pub fn save(&mut self) -> io::Result<usize> {
        let Some(path) = self.filename.clone() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "document has no filename",
            ));
        };

        let buf = self.to_bytes();
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(&buf)?;
        file.flush()?;

        self.dirty = 0;
        Ok(buf.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
