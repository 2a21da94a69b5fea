// SPDX-License-Identifier: MIT
//
// tedit — a small line-oriented terminal text editor.
//
// This is the main binary that wires together the crates:
//
//   tedit-term   → raw mode, input decoding, buffered ANSI output
//   tedit-editor → rows, syntax, document, cursor, viewport, compositor
//
// The Editor struct owns one of everything and runs a single-threaded
// cooperative loop. Each iteration composes and flushes one frame, then
// blocks on stdin for at most one poll interval (~100 ms):
//
//   render frame → read bytes → decode keys → dispatch → reclamp viewport
//
// Nothing runs concurrently: an edit is fully applied — including
// re-render and re-highlight — before the next key is read, so no frame
// ever shows a half-applied edit. The bounded read keeps the message bar
// expiring and resolves the lone-ESC ambiguity even when no key arrives.
//
// The save-as and search prompts run the same loop shape nested one
// level deep, feeding each keystroke to an optional callback. Search
// threads an explicit session value through that callback; cancelling
// restores the cursor and scroll position saved when the prompt opened.
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status bar (inverse)         │  ← 1 row
//   ├──────────────────────────────┤
//   │ message bar                  │  ← 1 row
//   └──────────────────────────────┘

use std::env;
use std::io;
use std::process;

use tedit_editor::cursor::{Cursor, Move};
use tedit_editor::document::Document;
use tedit_editor::message::StatusMessage;
use tedit_editor::screen::Screen;
use tedit_editor::search::{SearchKey, SearchSession};
use tedit_editor::view::Viewport;

use tedit_term::input::{Key, Parser};
use tedit_term::output::OutputBuffer;
use tedit_term::terminal::Terminal;

/// Ctrl-Q presses required to discard unsaved changes.
const QUIT_CONFIRMATIONS: u8 = 3;

/// What the dispatcher tells the run loop to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
}

/// A prompt keystroke callback (used by incremental search).
type PromptCallback = fn(&mut Editor, &str, Key);

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The whole editor: terminal, parser, document, and view state.
struct Editor {
    term: Terminal,
    parser: Parser,
    out: OutputBuffer,
    doc: Document,
    cursor: Cursor,
    view: Viewport,
    screen: Screen,
    message: StatusMessage,
    search: SearchSession,
    /// Remaining Ctrl-Q presses before a dirty document is abandoned.
    quit_times: u8,
}

impl Editor {
    fn new(doc: Document) -> io::Result<Self> {
        let term = Terminal::new()?;
        let screen = Screen::new(term.size());
        Ok(Self {
            term,
            parser: Parser::new(),
            out: OutputBuffer::new(),
            doc,
            cursor: Cursor::default(),
            view: Viewport::new(),
            screen,
            message: StatusMessage::new(),
            search: SearchSession::new(),
            quit_times: QUIT_CONFIRMATIONS,
        })
    }

    /// The main loop: render, read, dispatch, repeat.
    fn run(&mut self) -> io::Result<()> {
        self.term.enter()?;
        loop {
            self.refresh()?;
            for key in self.read_keys()? {
                if self.process_key(key)? == Action::Quit {
                    return self.term.leave();
                }
            }
        }
    }

    /// Reclamp the viewport and flush one composed frame in one write.
    fn refresh(&mut self) -> io::Result<()> {
        self.view.scroll(
            &mut self.cursor,
            &self.doc,
            self.screen.text_rows(),
            self.screen.cols(),
        );
        self.out.clear();
        self.screen
            .render(&mut self.out, &self.doc, &self.cursor, &self.view, &self.message)?;
        self.out.flush_stdout()
    }

    /// Read one bounded chunk of stdin and decode it.
    ///
    /// A timeout with bytes still pending in the parser means a lone ESC
    /// (or truncated sequence) — flush it into real keys.
    fn read_keys(&mut self) -> io::Result<Vec<Key>> {
        let mut buf = [0u8; 128];
        let n = self.term.read_input(&mut buf)?;
        if n == 0 {
            if self.parser.has_pending() {
                return Ok(self.parser.flush());
            }
            return Ok(Vec::new());
        }
        Ok(self.parser.advance(&buf[..n]))
    }

    // ── Key dispatch ────────────────────────────────────────────────

    fn process_key(&mut self, key: Key) -> io::Result<Action> {
        match key {
            Key::Enter => self.doc.insert_newline(&mut self.cursor),

            Key::Ctrl(b'q') => {
                if self.doc.is_dirty() && self.quit_times > 0 {
                    self.message.set(format!(
                        "WARNING! File has unsaved changes. \
                         Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return Ok(Action::Continue);
                }
                return Ok(Action::Quit);
            }

            Key::Ctrl(b's') => self.save()?,
            Key::Ctrl(b'f') => self.find()?,

            Key::Home => self.cursor.x = 0,
            Key::End => {
                if let Some(row) = self.doc.row(self.cursor.y) {
                    self.cursor.x = row.len();
                }
            }

            Key::Backspace | Key::Ctrl(b'h') => self.doc.delete_char(&mut self.cursor),
            Key::Delete => {
                // Forward delete is "step right, delete backward", except
                // at the very end of the document where there is nothing
                // to pull up.
                let at_end = self.cursor.y + 1 == self.doc.len()
                    && self
                        .doc
                        .row(self.cursor.y)
                        .is_some_and(|row| self.cursor.x >= row.len());
                if !at_end {
                    self.cursor.step(&self.doc, Move::Right);
                    self.doc.delete_char(&mut self.cursor);
                }
            }

            Key::PageUp | Key::PageDown => self.page(key),

            Key::Up => self.cursor.step(&self.doc, Move::Up),
            Key::Down => self.cursor.step(&self.doc, Move::Down),
            Key::Left => self.cursor.step(&self.doc, Move::Left),
            Key::Right => self.cursor.step(&self.doc, Move::Right),

            // Ctrl-L traditionally redraws; the next frame does anyway.
            Key::Ctrl(b'l') | Key::Escape => {}

            Key::Char(byte) => self.doc.insert_char(&mut self.cursor, byte),
            // Unbound control keys insert their raw byte, which the
            // compositor shows as an inverse glyph.
            Key::Ctrl(letter) => self.doc.insert_char(&mut self.cursor, letter & 0x1F),
        }

        self.quit_times = QUIT_CONFIRMATIONS;
        Ok(Action::Continue)
    }

    /// Move a full screen up or down, then clamp.
    fn page(&mut self, key: Key) {
        let rows = self.screen.text_rows();
        if key == Key::PageUp {
            self.cursor.y = self.view.top;
        } else {
            self.cursor.y = self.view.top + rows.saturating_sub(1);
        }
        if self.cursor.y > self.doc.len() {
            self.cursor.y = self.doc.len();
        }

        let direction = if key == Key::PageUp { Move::Up } else { Move::Down };
        for _ in 0..rows {
            self.cursor.step(&self.doc, direction);
        }
    }

    // ── Save ────────────────────────────────────────────────────────

    fn save(&mut self) -> io::Result<()> {
        if self.doc.filename().is_none() {
            match self.prompt("Save as: {} (ESC to cancel)", None)? {
                Some(name) => self.doc.set_filename(name),
                None => {
                    self.message.set("Save aborted");
                    return Ok(());
                }
            }
        }

        match self.doc.save() {
            Ok(bytes) => self.message.set(format!("{bytes} bytes written to disk")),
            Err(err) => self.message.set(format!("Can't save! I/O error: {err}")),
        }
        Ok(())
    }

    // ── Search ──────────────────────────────────────────────────────

    fn find(&mut self) -> io::Result<()> {
        let saved_cursor = self.cursor;
        let saved_view = self.view;

        self.search = SearchSession::new();
        let query = self.prompt(
            "Search: {} (Use ESC/Arrows/Enter)",
            Some(Self::search_callback),
        )?;

        // Cancelled: put the cursor and scroll back where they were.
        if query.is_none() {
            self.cursor = saved_cursor;
            self.view = saved_view;
        }
        Ok(())
    }

    fn search_callback(&mut self, query: &str, key: Key) {
        let search_key = match key {
            Key::Enter => SearchKey::Confirm,
            Key::Escape => SearchKey::Cancel,
            Key::Right | Key::Down => SearchKey::Next,
            Key::Left | Key::Up => SearchKey::Prev,
            _ => SearchKey::Other,
        };
        self.search
            .step(&mut self.doc, &mut self.cursor, query.as_bytes(), search_key);
    }

    // ── Prompt sub-loop ─────────────────────────────────────────────

    /// Run a nested read-render loop collecting a line of input in the
    /// message bar. `template` contains `{}` where the input appears.
    ///
    /// Returns `None` on Escape. The callback (if any) sees every
    /// keystroke, including the final Enter/Escape.
    fn prompt(
        &mut self,
        template: &str,
        callback: Option<PromptCallback>,
    ) -> io::Result<Option<String>> {
        let mut input = String::new();
        loop {
            self.message.set(template.replacen("{}", &input, 1));
            self.refresh()?;

            for key in self.read_keys()? {
                match key {
                    Key::Backspace | Key::Ctrl(b'h') | Key::Delete => {
                        input.pop();
                    }
                    Key::Escape => {
                        self.message.clear();
                        if let Some(cb) = callback {
                            cb(self, &input, key);
                        }
                        return Ok(None);
                    }
                    Key::Enter if !input.is_empty() => {
                        self.message.clear();
                        if let Some(cb) = callback {
                            cb(self, &input, key);
                        }
                        return Ok(Some(input));
                    }
                    Key::Char(byte) if (0x20..0x7F).contains(&byte) => {
                        input.push(byte as char);
                    }
                    _ => {}
                }
                if let Some(cb) = callback {
                    cb(self, &input, key);
                }
            }
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run() -> io::Result<()> {
    let doc = match env::args().nth(1) {
        Some(path) => Document::open(path)?,
        None => Document::new(),
    };

    let mut editor = Editor::new(doc)?;
    editor
        .message
        .set("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");
    editor.run()
}

fn main() {
    if let Err(err) = run() {
        eprintln!("tedit: {err}");
        process::exit(1);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
