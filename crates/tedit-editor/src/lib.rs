//! # tedit-editor — Editor core for tedit
//!
//! This crate contains the fundamental building blocks of the editor:
//!
//! - **[`row`]** — one document line: raw bytes, derived render text,
//!   per-byte highlight classes, and the raw↔render column mapping
//! - **[`syntax`]** — the static language table and the per-row
//!   highlighting state machine
//! - **[`document`]** — the row store with editing operations, the dirty
//!   counter, file load/save, and the cross-row re-highlight cascade
//! - **[`cursor`]** — cursor position with arrow movement and clamping
//! - **[`view`]** — viewport offsets that keep the cursor visible
//! - **[`screen`]** — frame composition into a single output buffer
//! - **[`search`]** — incremental substring search with a highlight overlay
//! - **[`message`]** — the status message with its display TTL

pub mod cursor;
pub mod document;
pub mod message;
pub mod row;
pub mod screen;
pub mod search;
pub mod syntax;
pub mod view;
