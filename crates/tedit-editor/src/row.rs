//! Row — one line of the document.
//!
//! A `Row` owns three parallel buffers: the raw text bytes, the derived
//! render bytes (tabs expanded to spaces), and one highlight class per
//! render byte. The render and highlight buffers are re-derived after
//! every raw-text mutation, so their lengths always agree between
//! operations.
//!
//! # Coordinate systems
//!
//! Raw columns index into the raw bytes; render columns index into the
//! render bytes. They diverge exactly at tabs: a tab occupies one raw
//! column but advances the render column to the next multiple of
//! [`TAB_STOP`]. [`raw_to_render`](Row::raw_to_render) and
//! [`render_to_raw`](Row::render_to_raw) convert between the two and are
//! exact inverses over `[0, len]` — the cursor and search both depend on
//! that round trip.

use crate::syntax::{self, Highlight, SyntaxDef};

/// Tab stop width in render columns.
pub const TAB_STOP: usize = 8;

/// One line of the document.
#[derive(Debug, Clone)]
pub struct Row {
    /// Raw text bytes, exactly as loaded or typed.
    raw: Vec<u8>,
    /// Render bytes: raw with each tab expanded to spaces.
    render: Vec<u8>,
    /// One highlight class per render byte.
    hl: Vec<Highlight>,
    /// Whether a block comment is still open at the end of this row.
    opens_comment: bool,
    /// Position of this row in the document. Renumbered on every
    /// insert/delete so it always equals the row's index in the store.
    index: usize,
}

impl Row {
    /// Create a row from raw bytes. The render and highlight buffers are
    /// derived immediately; highlighting starts out all-normal until the
    /// document runs its syntax pass.
    #[must_use]
    pub fn new(raw: Vec<u8>, index: usize) -> Self {
        let mut row = Self {
            raw,
            render: Vec::new(),
            hl: Vec::new(),
            opens_comment: false,
            index,
        };
        row.update_render();
        row
    }

    // -- Accessors ----------------------------------------------------------

    /// The raw text bytes.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The render bytes (tabs expanded).
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// One highlight class per render byte.
    #[inline]
    #[must_use]
    pub fn highlights(&self) -> &[Highlight] {
        &self.hl
    }

    /// Raw length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the row holds no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Render length in bytes.
    #[inline]
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Whether a block comment is still open at the end of this row.
    #[inline]
    #[must_use]
    pub const fn opens_comment(&self) -> bool {
        self.opens_comment
    }

    /// This row's position in the document.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    pub(crate) const fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    // -- Coordinate mapping -------------------------------------------------

    /// Convert a raw column to a render column.
    ///
    /// Sums the width of every raw byte before `cx`: a tab contributes
    /// enough columns to reach the next tab stop, everything else one.
    #[must_use]
    pub fn raw_to_render(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &b in self.raw.iter().take(cx) {
            if b == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Convert a render column back to a raw column.
    ///
    /// Accumulates widths the same way as [`raw_to_render`](Self::raw_to_render)
    /// until the accumulated width exceeds `rx`; returns the row length if
    /// it never does.
    #[must_use]
    pub fn render_to_raw(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &b) in self.raw.iter().enumerate() {
            if b == b'\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.raw.len()
    }

    // -- Mutation -----------------------------------------------------------
    //
    // Each mutator re-derives the render buffer before returning. The
    // highlight buffer is padded/truncated to the render length here and
    // overwritten by the document's syntax pass immediately after.

    /// Insert one byte at raw column `at` (clamped to the row length).
    pub(crate) fn insert_byte(&mut self, at: usize, byte: u8) {
        let at = at.min(self.raw.len());
        self.raw.insert(at, byte);
        self.update_render();
    }

    /// Delete the byte at raw column `at`. Out-of-range is a no-op.
    pub(crate) fn delete_byte(&mut self, at: usize) {
        if at >= self.raw.len() {
            return;
        }
        self.raw.remove(at);
        self.update_render();
    }

    /// Append bytes to the end of the row (row merge).
    pub(crate) fn append_bytes(&mut self, bytes: &[u8]) {
        self.raw.extend_from_slice(bytes);
        self.update_render();
    }

    /// Truncate the raw text to `at` bytes (row split).
    pub(crate) fn truncate(&mut self, at: usize) {
        self.raw.truncate(at);
        self.update_render();
    }

    /// Split off the raw tail from column `at`, leaving `at` bytes here.
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<u8> {
        let tail = self.raw.split_off(at.min(self.raw.len()));
        self.update_render();
        tail
    }

    /// Re-derive the render buffer from the raw text.
    fn update_render(&mut self) {
        self.render.clear();
        for &b in &self.raw {
            if b == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(b);
            }
        }
        // Keep the lengths in lockstep even before the next syntax pass.
        self.hl.resize(self.render.len(), Highlight::Normal);
    }

    // -- Highlighting -------------------------------------------------------

    /// Re-run the syntax state machine over this row.
    ///
    /// `starts_in_comment` is the previous row's open-comment output.
    /// Stores the new open-comment state and returns `true` when it
    /// changed — the signal for the document to continue the cascade on
    /// the following row.
    pub(crate) fn rescan(
        &mut self,
        syntax: Option<&SyntaxDef>,
        starts_in_comment: bool,
    ) -> bool {
        let ends_open = syntax::scan(&self.render, &mut self.hl, syntax, starts_in_comment);
        let changed = self.opens_comment != ends_open;
        self.opens_comment = ends_open;
        changed
    }

    /// Overlay a highlight class over a render-byte range (search match).
    pub(crate) fn overlay(&mut self, start: usize, len: usize, class: Highlight) {
        let end = (start + len).min(self.hl.len());
        for h in &mut self.hl[start.min(end)..end] {
            *h = class;
        }
    }

    /// Replace the whole highlight buffer (restoring a saved overlay).
    /// Ignored if the length no longer matches the render text.
    pub(crate) fn restore_highlights(&mut self, saved: Vec<Highlight>) {
        if saved.len() == self.render.len() {
            self.hl = saved;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(text: &str) -> Row {
        Row::new(text.as_bytes().to_vec(), 0)
    }

    #[test]
    fn render_plain_text_is_identity() {
        let r = row("hello");
        assert_eq!(r.render(), b"hello");
        assert_eq!(r.render_len(), 5);
    }

    #[test]
    fn render_expands_leading_tab_to_stop() {
        let r = row("\tx");
        assert_eq!(r.render(), b"        x");
        assert_eq!(r.render_len(), 9);
    }

    #[test]
    fn render_tab_advances_to_next_stop() {
        // "ab" occupies 2 columns, so the tab pads to column 8.
        let r = row("ab\tc");
        assert_eq!(r.render(), b"ab      c");
    }

    #[test]
    fn highlight_len_tracks_render_len() {
        let mut r = row("a\tb");
        assert_eq!(r.highlights().len(), r.render_len());
        r.insert_byte(0, b'\t');
        assert_eq!(r.highlights().len(), r.render_len());
        r.delete_byte(0);
        assert_eq!(r.highlights().len(), r.render_len());
    }

    #[test]
    fn raw_to_render_counts_tabs() {
        let r = row("\tab");
        assert_eq!(r.raw_to_render(0), 0);
        assert_eq!(r.raw_to_render(1), 8);
        assert_eq!(r.raw_to_render(2), 9);
        assert_eq!(r.raw_to_render(3), 10);
    }

    #[test]
    fn render_to_raw_inverts() {
        let r = row("\ta\tbc");
        for cx in 0..=r.len() {
            assert_eq!(r.render_to_raw(r.raw_to_render(cx)), cx, "cx = {cx}");
        }
    }

    #[test]
    fn round_trip_holds_for_plain_text() {
        let r = row("plain text, no tabs");
        for cx in 0..=r.len() {
            assert_eq!(r.render_to_raw(r.raw_to_render(cx)), cx);
        }
    }

    #[test]
    fn render_to_raw_past_end_clamps_to_len() {
        let r = row("ab");
        assert_eq!(r.render_to_raw(100), 2);
    }

    #[test]
    fn render_to_raw_mid_tab_points_at_tab() {
        let r = row("\tx");
        // Render columns 0..7 all fall inside the tab.
        for rx in 0..TAB_STOP {
            assert_eq!(r.render_to_raw(rx), 0, "rx = {rx}");
        }
        assert_eq!(r.render_to_raw(TAB_STOP), 1);
    }

    #[test]
    fn insert_byte_clamps_past_end() {
        let mut r = row("ab");
        r.insert_byte(99, b'c');
        assert_eq!(r.raw(), b"abc");
    }

    #[test]
    fn delete_byte_out_of_range_is_noop() {
        let mut r = row("ab");
        r.delete_byte(2);
        assert_eq!(r.raw(), b"ab");
    }

    #[test]
    fn split_off_keeps_prefix() {
        let mut r = row("hello world");
        let tail = r.split_off(5);
        assert_eq!(r.raw(), b"hello");
        assert_eq!(tail, b" world");
    }

    #[test]
    fn append_bytes_merges() {
        let mut r = row("foo");
        r.append_bytes(b"bar");
        assert_eq!(r.raw(), b"foobar");
        assert_eq!(r.render(), b"foobar");
    }

    #[test]
    fn overlay_clamps_to_render_len() {
        let mut r = row("abc");
        r.overlay(1, 99, Highlight::Match);
        assert_eq!(r.highlights()[0], Highlight::Normal);
        assert_eq!(r.highlights()[1], Highlight::Match);
        assert_eq!(r.highlights()[2], Highlight::Match);
    }

    #[test]
    fn restore_rejects_stale_length() {
        let mut r = row("abc");
        let saved = vec![Highlight::Match; 3];
        r.delete_byte(0);
        r.restore_highlights(saved);
        assert!(r.highlights().iter().all(|&h| h == Highlight::Normal));
    }
}
