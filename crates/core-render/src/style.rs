//! Named styles for the editor chrome.
//!
//! Composers pick a role (`Style::gutter_active`, `Style::status_bar`, ...)
//! instead of raw colors so the palette lives in one place.

use crate::{CellFlags, Color};
use core_state::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub flags: CellFlags,
}

impl Style {
    pub const fn fg(fg: Color) -> Self {
        Self {
            fg,
            bg: Color::Reset,
            flags: CellFlags::empty(),
        }
    }

    pub const fn reversed() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
            flags: CellFlags::REVERSE,
        }
    }

    pub const fn with_flags(mut self, flags: CellFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    pub const fn gutter_active() -> Self {
        Self::fg(Color::DarkYellow)
    }

    pub const fn gutter() -> Self {
        Self::fg(Color::DarkGrey)
    }

    /// `~` rows past the end of the document.
    pub const fn filler() -> Self {
        Self::fg(Color::DarkGrey)
    }

    /// Continuation markers at clipped line edges.
    pub const fn marker() -> Self {
        Self::fg(Color::Cyan)
    }

    pub const fn status_bar() -> Self {
        Self::reversed()
    }

    pub const fn overlay_border() -> Self {
        Self::fg(Color::Cyan)
    }

    pub const fn message(severity: Severity) -> Self {
        match severity {
            Severity::Info => Self::fg(Color::Reset),
            Severity::Success => Self::fg(Color::Green),
            Severity::Alert => Self::fg(Color::Red),
        }
    }
}
