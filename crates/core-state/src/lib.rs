//! Editor state primitives shared by the model, dispatcher and renderer.
//!
//! * `undo` holds the invertible `Edit` vocabulary and the per-slot
//!   `UndoHistory`.
//! * `Mode` is the primary modal state. The command line carries its own
//!   editing state inside `Mode::CommandLine` so leaving the mode drops it.
//! * `Overlay` is orthogonal to the mode and only ever attached while in
//!   Navigation; the dispatcher detaches it on any key it does not consume.
//! * `StatusMessage` lives until the next key press replaces or clears it.

use core_text::Cursor;

pub mod undo;
pub use undo::{Edit, UNDO_HISTORY_MAX, UndoError, UndoHistory};

/// Primary editor mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigation,
    Insertion,
    CommandLine(CommandLine),
}

impl Mode {
    /// Label used by the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Navigation => "NAVIGATION",
            Mode::Insertion => "INSERTION",
            Mode::CommandLine(_) => "COMMAND",
        }
    }

    pub fn is_navigation(&self) -> bool {
        matches!(self, Mode::Navigation)
    }
}

/// In-progress command line text plus its edit position.
///
/// `edit_position` is 1-based within `text` and bounded to
/// `[1, len(text) + 1]`. `entry_cursor` is the buffer cursor captured when
/// the command line was opened; cancelling restores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    text: String,
    edit_position: usize,
    entry_cursor: Cursor,
}

impl CommandLine {
    pub fn new(entry_cursor: Cursor) -> Self {
        Self {
            text: String::new(),
            edit_position: 1,
            entry_cursor,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn edit_position(&self) -> usize {
        self.edit_position
    }

    pub fn entry_cursor(&self) -> Cursor {
        self.entry_cursor
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, position: usize) -> usize {
        self.text
            .char_indices()
            .nth(position - 1)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Insert `ch` at the edit position and advance past it.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.edit_position);
        self.text.insert(at, ch);
        self.edit_position += 1;
    }

    /// Remove the character before the edit position.
    ///
    /// Returns `false` when the text was already empty, which the caller
    /// treats as a request to leave the command line.
    pub fn backspace(&mut self) -> bool {
        if self.text.is_empty() {
            return false;
        }
        if self.edit_position > 1 {
            let at = self.byte_offset(self.edit_position - 1);
            self.text.remove(at);
            self.edit_position -= 1;
        }
        true
    }

    pub fn move_left(&mut self) {
        if self.edit_position > 1 {
            self.edit_position -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.edit_position <= self.len() {
            self.edit_position += 1;
        }
    }
}

/// Transient panel drawn over the buffer rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Open buffers; entries are derived from the session at render time.
    BufferList { selected: usize },
    SearchResults(SearchResults),
}

impl Overlay {
    pub fn selected(&self) -> usize {
        match self {
            Overlay::BufferList { selected } => *selected,
            Overlay::SearchResults(results) => results.selected,
        }
    }

    /// Move the selection by one row within `len` entries, saturating at the ends.
    pub fn step(&mut self, forward: bool, len: usize) {
        let selected = match self {
            Overlay::BufferList { selected } => selected,
            Overlay::SearchResults(results) => &mut results.selected,
        };
        if forward {
            if *selected + 1 < len {
                *selected += 1;
            }
        } else {
            *selected = selected.saturating_sub(1);
        }
    }
}

/// Literal matches of `pattern` in the active document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub pattern: String,
    pub replacement: String,
    pub matches: Vec<Cursor>,
    pub selected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Alert,
}

/// One-shot message for the message line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Success,
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Alert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_inserts_at_edit_position() {
        let mut cl = CommandLine::new(Cursor::new(3, 2));
        for ch in "wq".chars() {
            cl.insert(ch);
        }
        assert_eq!(cl.edit_position(), 3);
        cl.move_left();
        cl.move_left();
        cl.move_left();
        assert_eq!(cl.edit_position(), 1, "never before the first character");
        cl.insert('e');
        assert_eq!(cl.text(), "ewq");
        for _ in 0..10 {
            cl.move_right();
        }
        assert_eq!(cl.edit_position(), 4);
        assert_eq!(cl.entry_cursor(), Cursor::new(3, 2));
    }

    #[test]
    fn command_line_backspace_signals_exit_when_empty() {
        let mut cl = CommandLine::new(Cursor::origin());
        cl.insert('q');
        cl.insert('é');
        assert!(cl.backspace());
        assert_eq!(cl.text(), "q");
        assert!(cl.backspace());
        assert_eq!(cl.text(), "");
        assert_eq!(cl.edit_position(), 1);
        assert!(!cl.backspace());
    }

    #[test]
    fn command_line_backspace_mid_text() {
        let mut cl = CommandLine::new(Cursor::origin());
        for ch in "abc".chars() {
            cl.insert(ch);
        }
        cl.move_left();
        assert!(cl.backspace());
        assert_eq!(cl.text(), "ac");
        assert_eq!(cl.edit_position(), 2);
    }

    #[test]
    fn overlay_selection_saturates() {
        let mut o = Overlay::BufferList { selected: 0 };
        o.step(false, 3);
        assert_eq!(o.selected(), 0);
        o.step(true, 3);
        o.step(true, 3);
        o.step(true, 3);
        assert_eq!(o.selected(), 2);
    }

    #[test]
    fn mode_labels() {
        assert_eq!(Mode::default().label(), "NAVIGATION");
        assert_eq!(Mode::Insertion.label(), "INSERTION");
        assert_eq!(
            Mode::CommandLine(CommandLine::new(Cursor::origin())).label(),
            "COMMAND"
        );
    }
}
