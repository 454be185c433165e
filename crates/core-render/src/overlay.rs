//! Overlay panels drawn over the buffer rows.
//!
//! An overlay is a bordered box centered in the content region with a title
//! in its top border and one entry per row. The selected entry is reversed;
//! when entries outnumber the interior rows the list scrolls to keep the
//! selection visible.

use crate::{CellFlags, Frame, Style};
use core_model::{LayoutRegion, Session};
use core_state::Overlay;

/// Box-drawing glyphs: corners, horizontal, vertical.
const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayPanel {
    pub title: &'static str,
    pub rows: Vec<String>,
    pub selected: usize,
}

impl OverlayPanel {
    /// Panel for the session's current overlay, if any.
    pub fn from_session(session: &Session) -> Option<Self> {
        let overlay = session.overlay.as_ref()?;
        let panel = match overlay {
            Overlay::BufferList { selected } => Self {
                title: "Buffers",
                rows: session
                    .buffer_entries()
                    .iter()
                    .map(|e| {
                        let marker = if e.active { '%' } else { ' ' };
                        format!("{:>3}{marker} {}  {}", e.number, e.label(), e.path)
                    })
                    .collect(),
                selected: *selected,
            },
            Overlay::SearchResults(results) => {
                let doc = &session.active().document;
                Self {
                    title: "Search Results",
                    rows: results
                        .matches
                        .iter()
                        .map(|m| {
                            let text = doc.line(m.line).unwrap_or_default();
                            format!("{}:{}: {}", m.line, m.column, text.trim())
                        })
                        .collect(),
                    selected: results.selected,
                }
            }
        };
        Some(panel)
    }

    /// Outer rectangle of the box inside `region`.
    pub fn bounds(&self, region: LayoutRegion) -> Option<LayoutRegion> {
        if region.width < 4 || region.height < 3 {
            return None;
        }
        let longest = self
            .rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0)
            .max(self.title.chars().count() + 2);
        let width = clamp_u16(longest + 4, region.width);
        let height = clamp_u16(self.rows.len().max(1) + 2, region.height);
        let x = region.x + (region.width - width) / 2;
        let y = region.y + (region.height - height) / 2;
        Some(LayoutRegion::new(x, y, width, height))
    }

    pub fn draw(&self, frame: &mut Frame, region: LayoutRegion) {
        let Some(b) = self.bounds(region) else {
            return;
        };
        let border = Style::overlay_border();
        let right = b.x + b.width - 1;
        let bottom = b.y + b.height - 1;
        for x in b.x..=right {
            frame.set(x, b.y, HORIZONTAL, border);
            frame.set(x, bottom, HORIZONTAL, border);
        }
        for y in b.y..=bottom {
            frame.set(b.x, y, VERTICAL, border);
            frame.set(right, y, VERTICAL, border);
        }
        frame.set(b.x, b.y, TOP_LEFT, border);
        frame.set(right, b.y, TOP_RIGHT, border);
        frame.set(b.x, bottom, BOTTOM_LEFT, border);
        frame.set(right, bottom, BOTTOM_RIGHT, border);
        frame.put_str(b.x + 2, b.y, &format!(" {} ", self.title), border);

        let inner_width = usize::from(b.width - 2);
        let inner_rows = usize::from(b.height - 2);
        let first = self.selected.saturating_sub(inner_rows.saturating_sub(1));
        for (i, row) in self.rows.iter().enumerate().skip(first).take(inner_rows) {
            let y = b.y + 1 + (i - first) as u16;
            let style = if i == self.selected {
                Style::default().with_flags(CellFlags::REVERSE)
            } else {
                Style::default()
            };
            let text: String = format!(" {row}")
                .chars()
                .chain(std::iter::repeat(' '))
                .take(inner_width)
                .collect();
            frame.put_str(b.x + 1, y, &text, style);
        }
    }
}

fn clamp_u16(wanted: usize, limit: u16) -> u16 {
    u16::try_from(wanted).unwrap_or(u16::MAX).min(limit)
}
