//! Search — incremental substring search with a highlight overlay.
//!
//! One [`SearchSession`] lives for the duration of a search prompt. Each
//! keystroke of the prompt feeds a [`SearchKey`] into
//! [`step`](SearchSession::step), which moves the cursor to the next
//! match and overlays the matched render bytes with
//! [`Highlight::Match`]. The overlay is saved before it is applied and
//! restored at the start of the next step, so exactly one match is ever
//! highlighted and the row's real highlighting survives the session.
//!
//! The session state is an explicit value threaded through the prompt
//! loop — sessions are independent and unit-testable, with no hidden
//! state carried between searches.

use crate::cursor::Cursor;
use crate::document::Document;
use crate::syntax::Highlight;

/// Search direction through the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// What the latest prompt keystroke means to the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    /// Enter — accept the current match and end the session.
    Confirm,
    /// Escape — abandon the search (the caller restores the cursor).
    Cancel,
    /// Move to the next match (Right/Down arrows).
    Next,
    /// Move to the previous match (Left/Up arrows).
    Prev,
    /// The query changed — restart from the top.
    Other,
}

/// A saved highlight buffer, for undoing the match overlay.
#[derive(Debug)]
struct SavedHighlight {
    row: usize,
    hl: Vec<Highlight>,
}

/// State for one search session.
#[derive(Debug)]
pub struct SearchSession {
    /// Row of the last match, or `None` to restart from the top.
    last_match: Option<usize>,
    direction: Direction,
    /// Highlights overlaid by the previous step, to be restored.
    saved: Option<SavedHighlight>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    /// A fresh session: no match yet, searching forward.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_match: None,
            direction: Direction::Forward,
            saved: None,
        }
    }

    /// The row of the last match, if any.
    #[inline]
    #[must_use]
    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// The current search direction.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Advance the search session by one prompt keystroke.
    ///
    /// Restores the previous overlay, interprets `key`, then scans at
    /// most `doc.len()` rows from the last match in the current
    /// direction, wrapping at both ends. On a match the cursor moves to
    /// the match (raw column via the render→raw mapping) and the matched
    /// range is overlaid. With no match, the session and cursor are left
    /// unchanged.
    pub fn step(
        &mut self,
        doc: &mut Document,
        cursor: &mut Cursor,
        query: &[u8],
        key: SearchKey,
    ) {
        // Undo the previous step's overlay before anything else.
        if let Some(saved) = self.saved.take() {
            if let Some(row) = doc.row_mut(saved.row) {
                row.restore_highlights(saved.hl);
            }
        }

        match key {
            SearchKey::Confirm | SearchKey::Cancel => {
                self.last_match = None;
                self.direction = Direction::Forward;
                return;
            }
            SearchKey::Next => self.direction = Direction::Forward,
            SearchKey::Prev => self.direction = Direction::Backward,
            SearchKey::Other => {
                self.last_match = None;
                self.direction = Direction::Forward;
            }
        }
        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }

        if query.is_empty() || doc.is_empty() {
            return;
        }

        let len = doc.len();
        let step: isize = match self.direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        };

        #[allow(clippy::cast_possible_wrap)]
        let mut current: isize = self.last_match.map_or(-1, |i| i as isize);

        for _ in 0..len {
            current += step;
            #[allow(clippy::cast_possible_wrap)]
            if current == -1 {
                current = len as isize - 1;
            } else if current == len as isize {
                current = 0;
            }

            #[allow(clippy::cast_sign_loss)] // Wrapped into [0, len) above.
            let index = current as usize;
            let Some(row) = doc.row(index) else {
                continue;
            };

            let Some(at) = find(row.render(), query) else {
                continue;
            };

            self.last_match = Some(index);
            cursor.y = index;
            cursor.x = row.render_to_raw(at);

            let saved = row.highlights().to_vec();
            self.saved = Some(SavedHighlight { row: index, hl: saved });
            if let Some(row) = doc.row_mut(index) {
                row.overlay(at, query.len(), Highlight::Match);
            }
            break;
        }
    }
}

/// First occurrence of `needle` in `haystack`, as a byte offset.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc() -> Document {
        Document::from_text("needle in row zero\nplain row\nanother needle here")
    }

    #[test]
    fn first_step_finds_first_row() {
        let mut doc = doc();
        let mut cursor = Cursor::default();
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Other);
        assert_eq!(session.last_match(), Some(0));
        assert_eq!((cursor.y, cursor.x), (0, 0));
    }

    #[test]
    fn next_advances_and_wraps_forward() {
        let mut doc = doc();
        let mut cursor = Cursor::default();
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Other);
        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Next);
        assert_eq!(session.last_match(), Some(2));
        assert_eq!(cursor.x, 8);

        // Wrap past the end back to row 0.
        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Next);
        assert_eq!(session.last_match(), Some(0));
    }

    #[test]
    fn wraps_around_from_last_row() {
        // The query appears only in the first row; searching forward from
        // the end must wrap around and find it.
        let mut doc = Document::from_text("target\nnothing\nnothing");
        let mut cursor = Cursor { x: 0, y: 2, rx: 0 };
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"target", SearchKey::Other);
        assert_eq!(session.last_match(), Some(0));
        assert_eq!(cursor.y, 0);
    }

    #[test]
    fn prev_wraps_backward() {
        let mut doc = doc();
        let mut cursor = Cursor::default();
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Other);
        assert_eq!(session.last_match(), Some(0));

        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Prev);
        assert_eq!(session.direction(), Direction::Backward);
        assert_eq!(session.last_match(), Some(2));
    }

    #[test]
    fn no_match_leaves_state_and_cursor() {
        let mut doc = doc();
        let mut cursor = Cursor { x: 3, y: 1, rx: 0 };
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"absent", SearchKey::Other);
        assert_eq!(session.last_match(), None);
        assert_eq!((cursor.x, cursor.y), (3, 1));
    }

    #[test]
    fn match_is_overlaid_and_restored() {
        let mut doc = doc();
        let mut cursor = Cursor::default();
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Other);
        let hl = doc.row(0).unwrap().highlights();
        assert!(hl[0..6].iter().all(|&h| h == Highlight::Match));
        assert_eq!(hl[6], Highlight::Normal);

        // The next step restores row 0 before overlaying row 2.
        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Next);
        assert!(doc
            .row(0)
            .unwrap()
            .highlights()
            .iter()
            .all(|&h| h == Highlight::Normal));
        assert!(doc.row(2).unwrap().highlights()[8..14]
            .iter()
            .all(|&h| h == Highlight::Match));
    }

    #[test]
    fn cancel_restores_overlay_and_resets() {
        let mut doc = doc();
        let mut cursor = Cursor::default();
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Other);
        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Cancel);

        assert_eq!(session.last_match(), None);
        assert_eq!(session.direction(), Direction::Forward);
        assert!(doc
            .row(0)
            .unwrap()
            .highlights()
            .iter()
            .all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn query_change_restarts_from_top() {
        let mut doc = doc();
        let mut cursor = Cursor::default();
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Other);
        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Next);
        assert_eq!(session.last_match(), Some(2));

        // Typing another character resets the match anchor.
        session.step(&mut doc, &mut cursor, b"needle ", SearchKey::Other);
        assert_eq!(session.last_match(), Some(0));
    }

    #[test]
    fn match_column_maps_through_tabs() {
        let mut doc = Document::from_text("\tneedle");
        let mut cursor = Cursor::default();
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"needle", SearchKey::Other);
        // Render offset 8 maps back to raw column 1 (after the tab).
        assert_eq!(cursor.x, 1);
    }

    #[test]
    fn empty_query_is_inert() {
        let mut doc = doc();
        let mut cursor = Cursor::default();
        let mut session = SearchSession::new();

        session.step(&mut doc, &mut cursor, b"", SearchKey::Other);
        assert_eq!(session.last_match(), None);
        assert_eq!(cursor, Cursor::default());
    }
}
