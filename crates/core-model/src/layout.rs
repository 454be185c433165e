//! Screen layout: how terminal rows are split between the tab bar, the
//! buffer rows, the status bar and the message line.
//!
//! Invariants:
//! * The status bar and message line always occupy the last two rows.
//! * The tab bar (row 0) exists only when more than one slot is open.
//! * Degenerate terminals (fewer rows than chrome) yield an empty content
//!   region rather than underflowing.

/// Rows reserved below the buffer rows (status bar + message line).
pub const CHROME_ROWS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl LayoutRegion {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub tab_bar: Option<u16>,
    pub content: LayoutRegion,
    pub status_row: u16,
    pub message_row: u16,
}

impl Layout {
    /// Compute the layout for a `width` x `height` terminal showing
    /// `slot_count` open buffers.
    pub fn compute(width: u16, height: u16, slot_count: usize) -> Self {
        let tabs = slot_count > 1 && height > CHROME_ROWS;
        let top = u16::from(tabs);
        let content_height = height.saturating_sub(CHROME_ROWS + top);
        Self {
            tab_bar: tabs.then_some(0),
            content: LayoutRegion::new(0, top, width, content_height),
            status_row: height.saturating_sub(2),
            message_row: height.saturating_sub(1),
        }
    }
}
