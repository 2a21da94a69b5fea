//! Viewport — the scroll offsets that keep the cursor visible.
//!
//! The viewport tracks the first visible row (`top`) and the first
//! visible render column (`left`). Horizontal clamping works in render
//! columns, not raw columns — a cursor sitting after a tab is eight
//! columns wide on screen, and the viewport must follow the screen
//! position.

use crate::cursor::Cursor;
use crate::document::Document;

/// Scroll state: first visible row and first visible render column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row index.
    pub top: usize,
    /// First visible render column.
    pub left: usize,
}

impl Viewport {
    /// Create a viewport at the document origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { top: 0, left: 0 }
    }

    /// Recompute the cursor's render column and clamp the offsets so the
    /// cursor stays inside a `text_rows` × `text_cols` window.
    ///
    /// Called after every cursor move or edit, before composing a frame.
    pub fn scroll(
        &mut self,
        cursor: &mut Cursor,
        doc: &Document,
        text_rows: usize,
        text_cols: usize,
    ) {
        cursor.rx = doc
            .row(cursor.y)
            .map_or(cursor.x, |row| row.raw_to_render(cursor.x));

        if cursor.y < self.top {
            self.top = cursor.y;
        }
        if text_rows > 0 && cursor.y >= self.top + text_rows {
            self.top = cursor.y - text_rows + 1;
        }
        if cursor.rx < self.left {
            self.left = cursor.rx;
        }
        if text_cols > 0 && cursor.rx >= self.left + text_cols {
            self.left = cursor.rx - text_cols + 1;
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

    fn doc(lines: usize) -> Document {
        let text = (0..lines)
            .map(|i| format!("line number {i} with some width"))
            .collect::<Vec<_>>()
            .join("\n");
        Document::from_text(&text)
    }

    #[test]
    fn cursor_inside_window_leaves_offsets() {
        let doc = doc(50);
        let mut view = Viewport::new();
        let mut cursor = Cursor { x: 3, y: 5, rx: 0 };
        view.scroll(&mut cursor, &doc, 10, 40);
        assert_eq!((view.top, view.left), (0, 0));
        assert_eq!(cursor.rx, 3);
    }

    #[test]
    fn cursor_below_window_scrolls_down() {
        let doc = doc(50);
        let mut view = Viewport::new();
        let mut cursor = Cursor { x: 0, y: 25, rx: 0 };
        view.scroll(&mut cursor, &doc, 10, 40);
        assert_eq!(view.top, 16);
    }

    #[test]
    fn cursor_above_window_scrolls_up() {
        let doc = doc(50);
        let mut view = Viewport { top: 30, left: 0 };
        let mut cursor = Cursor { x: 0, y: 10, rx: 0 };
        view.scroll(&mut cursor, &doc, 10, 40);
        assert_eq!(view.top, 10);
    }

    #[test]
    fn cursor_right_of_window_scrolls_right() {
        let doc = doc(5);
        let mut view = Viewport::new();
        let mut cursor = Cursor { x: 25, y: 0, rx: 0 };
        view.scroll(&mut cursor, &doc, 10, 20);
        assert_eq!(view.left, 6);
    }

    #[test]
    fn cursor_left_of_window_scrolls_left() {
        let doc = doc(5);
        let mut view = Viewport { top: 0, left: 15 };
        let mut cursor = Cursor { x: 2, y: 0, rx: 0 };
        view.scroll(&mut cursor, &doc, 10, 20);
        assert_eq!(view.left, 2);
    }

    #[test]
    fn horizontal_clamp_uses_render_columns() {
        let doc = Document::from_text("\tafter tab");
        let mut view = Viewport::new();
        // Raw column 1 is render column 8 — past a 5-column window.
        let mut cursor = Cursor { x: 1, y: 0, rx: 0 };
        view.scroll(&mut cursor, &doc, 10, 5);
        assert_eq!(cursor.rx, 8);
        assert_eq!(view.left, 4);
    }

    #[test]
    fn append_line_has_render_column_of_raw() {
        let doc = doc(3);
        let mut view = Viewport::new();
        let mut cursor = Cursor { x: 0, y: 3, rx: 7 };
        view.scroll(&mut cursor, &doc, 10, 20);
        assert_eq!(cursor.rx, 0);
    }
}
