//! Visible window over one document.
//!
//! `top_line` is 1-based. `horizontal_offset` counts hidden columns and is
//! shared by every rendered row of the slot, so a long cursor line scrolls
//! its neighbours with it.

use tracing::trace;

pub const LEADING_MARKER: char = '«';
pub const TRAILING_MARKER: char = '»';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top_line: usize,
    pub horizontal_offset: usize,
    pub height: usize,
    pub width: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 22)
    }
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            top_line: 1,
            horizontal_offset: 0,
            height,
            width,
        }
    }

    pub fn bottom_line(&self) -> usize {
        self.top_line + self.height.saturating_sub(1)
    }

    pub fn is_visible(&self, line: usize) -> bool {
        self.height > 0 && line >= self.top_line && line <= self.bottom_line()
    }

    /// Columns left for text once `gutter` columns are taken.
    pub fn text_width(&self, gutter: usize) -> usize {
        self.width.saturating_sub(gutter)
    }

    /// Minimal vertical shift that brings `line` into view.
    pub fn follow_line(&mut self, line: usize) {
        if self.height == 0 {
            return;
        }
        if line < self.top_line {
            self.top_line = line.max(1);
        } else if line > self.bottom_line() {
            self.top_line = line + 1 - self.height;
        }
    }

    /// Minimal horizontal shift that keeps `column` inside
    /// `[offset + 1, offset + text_width]`.
    pub fn follow_column(&mut self, column: usize, text_width: usize) {
        if text_width == 0 {
            return;
        }
        if column <= self.horizontal_offset {
            self.horizontal_offset = column.saturating_sub(1);
        } else if column > self.horizontal_offset + text_width {
            self.horizontal_offset = column - text_width;
        }
    }

    /// Center `line` vertically unless it is already visible.
    ///
    /// With `force` the view recenters even when the line is visible. The
    /// resulting top line stays within `[1, max(1, line_count - height + 1)]`.
    pub fn recenter_on(&mut self, line: usize, line_count: usize, force: bool) {
        if !force && self.is_visible(line) {
            return;
        }
        let max_top = line_count.saturating_sub(self.height).saturating_add(1).max(1);
        let top = line.saturating_sub(self.height / 2 + 1);
        self.top_line = top.clamp(1, max_top);
        self.follow_line(line);
        trace!(target: "model.viewport", line, top_line = self.top_line, "recenter");
    }

    /// Visible characters of `text` for this window, with continuation
    /// markers in place of clipped characters.
    pub fn project(&self, text: &str, text_width: usize) -> Vec<char> {
        let len = text.chars().count();
        let mut cells: Vec<char> = text
            .chars()
            .skip(self.horizontal_offset)
            .take(text_width)
            .collect();
        if text_width == 0 {
            return cells;
        }
        if self.horizontal_offset > 0 && len > 0 {
            match cells.first_mut() {
                Some(first) => *first = LEADING_MARKER,
                None => cells.push(LEADING_MARKER),
            }
        }
        if len > self.horizontal_offset + text_width
            && let Some(last) = cells.last_mut()
        {
            *last = TRAILING_MARKER;
        }
        cells
    }

    /// Screen column (0-based, within the text area) of document `column`.
    pub fn screen_column(&self, column: usize) -> usize {
        column.saturating_sub(self.horizontal_offset + 1)
    }

    /// Screen row (0-based, within the content region) of document `line`.
    pub fn screen_row(&self, line: usize) -> usize {
        line.saturating_sub(self.top_line)
    }
}

/// Width of the line-number gutter: `digits + 1` columns for the number
/// plus the separator, or 0 when disabled.
pub fn gutter_width(line_count: usize, enabled: bool) -> usize {
    if enabled { digits(line_count) + 2 } else { 0 }
}

/// Gutter text for `line`, right aligned to `gutter_width - 1` columns.
pub fn gutter_label(line: usize, line_count: usize) -> String {
    format!("{:>width$}│", line, width = digits(line_count) + 1)
}

fn digits(mut n: usize) -> usize {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}
