//! Editor model: per-buffer slots, their viewports and the session.
//!
//! A `Slot` bundles a `Document` with its `Cursor`, sticky column,
//! `Viewport` and `UndoHistory`; the `Session` owns the ordered slot list,
//! the active index and the global modal state.
//!
//! Core invariants (must hold after every public call):
//! * `slots` is never empty and `active < slots.len()`.
//! * Each slot's cursor lies inside its document.
//! * After `scroll_to_cursor`/`resize` the active cursor is inside its
//!   viewport, both vertically and horizontally.
//!
//! Scroll policies:
//! * Ordinary motion uses the minimal shift (`Viewport::follow_line`,
//!   `Viewport::follow_column`).
//! * Goto-line recenters only when the target is off-screen.
//! * Center-and-reset always recenters and clears the horizontal offset.

mod layout;
mod session;
mod viewport;

pub use layout::{CHROME_ROWS, Layout, LayoutRegion};
pub use session::{BufferEntry, CloseOutcome, Session, SessionOptions, Slot};
pub use viewport::{LEADING_MARKER, TRAILING_MARKER, Viewport, gutter_label, gutter_width};
