// SPDX-License-Identifier: MIT
//
// tedit-term — terminal layer for tedit.
//
// Everything the editor core needs from the terminal, and nothing more:
// raw mode with guaranteed restore, a window-size query, a byte-level
// input parser that turns escape sequences into logical keys, and a
// frame buffer that accumulates a whole screen of ANSI output so it can
// be flushed in a single write.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via ANSI escape
// sequences and raw termios. Every byte sent to the terminal is
// accounted for.

pub mod ansi;
pub mod color;
pub mod input;
pub mod output;
pub mod terminal;
