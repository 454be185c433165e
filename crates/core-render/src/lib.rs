//! Rendering primitives and frame assembly.
//!
//! A repaint is always a full frame derived from the `Session`:
//! `render(session, ctx)` builds a `Frame` (one `Cell` per terminal cell plus
//! the designated cursor cell) and `writer::Writer` turns it into crossterm
//! commands. There are no partial caches, so a frame can be rebuilt at any
//! time (resize, resume after suspend) without drift.
//!
//! Invariants:
//! - Every cell holds exactly one character of display width one. Wider or
//!   zero-width characters are replaced by `·` during composition so the
//!   screen column of a document column is a plain offset.
//! - `Frame::cells.len() == width * height`; writes outside the grid are
//!   dropped.
//! - The cursor, when present, lies inside the grid.
//!
//! Exposed components:
//! - `Cell` / `Frame`: logical grid.
//! - `compose`: the `render` entry point (tab bar, buffer rows, status bar,
//!   message line).
//! - `status`: status bar segments and formatting.
//! - `overlay`: bordered panels for the buffer list and search results.
//! - `style`: named styles shared by the composers.
//! - `writer`: frame -> terminal command translation.

use bitflags::bitflags;

pub mod compose;
pub mod overlay;
pub mod status;
pub mod style;
pub mod writer;

pub use compose::{RenderContext, render};
pub use style::Style;

/// Stand-in for characters that do not occupy exactly one cell.
pub const REPLACEMENT_GLYPH: char = '·';

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001;
        const BOLD    = 0b0000_0010;
    }
}

/// Terminal colors used by the editor chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Reset,
    DarkGrey,
    DarkYellow,
    Red,
    Green,
    Cyan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub flags: CellFlags,
}

impl Cell {
    pub fn new(ch: char, style: Style) -> Self {
        Self {
            ch,
            fg: style.fg,
            bg: style.bg,
            flags: style.flags,
        }
    }

    pub fn style(&self) -> Style {
        Style {
            fg: self.fg,
            bg: self.bg,
            flags: self.flags,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(' ', Style::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
    /// Cell that receives the hardware cursor.
    pub cursor: Option<(u16, u16)>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            cursor: None,
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Write one character, substituting `REPLACEMENT_GLYPH` for anything
    /// that is not exactly one cell wide.
    pub fn set(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::new(single_cell(ch), style);
        }
    }

    /// Write `text` from `(x, y)` and return the column after the last
    /// written character (clipped at the right edge).
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            self.set(col, y, ch, style);
            col += 1;
        }
        col
    }

    /// Apply `style` to the whole row `y`.
    pub fn fill_row(&mut self, y: u16, style: Style) {
        for x in 0..self.width {
            if let Some(idx) = self.index(x, y) {
                self.cells[idx] = Cell::new(self.cells[idx].ch, style);
            }
        }
    }

    pub fn set_cursor(&mut self, x: u16, y: u16) {
        if x < self.width && y < self.height {
            self.cursor = Some((x, y));
        }
    }

    /// Characters of row `y` (testing / diagnostics).
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)]
            .iter()
            .map(|c| c.ch)
            .collect()
    }
}

fn single_cell(ch: char) -> char {
    use unicode_width::UnicodeWidthChar;
    if ch.width() == Some(1) {
        ch
    } else {
        REPLACEMENT_GLYPH
    }
}
