//! Buffer slots and the session that owns them.

use crate::layout::Layout;
use crate::viewport::{Viewport, gutter_width};
use core_state::{Edit, Mode, Overlay, StatusMessage, UndoError, UndoHistory};
use core_text::{Cursor, Document, DocumentError};
use std::path::Path;
use tracing::{debug, info};

/// Session-wide presentation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub line_numbers: bool,
    pub tab_width: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            tab_width: 4,
        }
    }
}

/// A document bundled with its own cursor, viewport and undo history.
#[derive(Debug, Clone)]
pub struct Slot {
    pub document: Document,
    pub cursor: Cursor,
    /// Sticky column for vertical motion.
    pub desired_column: usize,
    pub viewport: Viewport,
    pub history: UndoHistory,
}

impl Slot {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            cursor: Cursor::origin(),
            desired_column: 1,
            viewport: Viewport::default(),
            history: UndoHistory::new(),
        }
    }

    /// Move the cursor and reset the sticky column to it.
    pub fn set_cursor(&mut self, mut cursor: Cursor) {
        cursor.clamp_to(&self.document);
        self.cursor = cursor;
        self.desired_column = cursor.column;
    }

    pub fn gutter_width(&self, line_numbers: bool) -> usize {
        gutter_width(self.document.line_count(), line_numbers)
    }

    pub fn text_width(&self, line_numbers: bool) -> usize {
        self.viewport.text_width(self.gutter_width(line_numbers))
    }

    /// Minimal scroll that keeps the cursor inside the viewport.
    pub fn scroll_to_cursor(&mut self, line_numbers: bool) {
        self.cursor.clamp_to(&self.document);
        let text_width = self.text_width(line_numbers);
        self.viewport.follow_line(self.cursor.line);
        self.viewport.follow_column(self.cursor.column, text_width);
    }

    /// Apply a primitive edit through the history and land the cursor.
    pub fn apply(&mut self, edit: Edit) -> Result<(), UndoError> {
        let cursor = self.history.apply(&mut self.document, edit)?;
        self.set_cursor(cursor);
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), UndoError> {
        let cursor = self.history.undo(&mut self.document)?;
        self.set_cursor(cursor);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), UndoError> {
        let cursor = self.history.redo(&mut self.document)?;
        self.set_cursor(cursor);
        Ok(())
    }
}

/// Outcome of closing a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The slot was the only one; the process must terminate instead.
    LastSlot,
}

/// Rendering data for one open buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferEntry {
    /// 1-based, as accepted by `;b N`.
    pub number: usize,
    pub name: String,
    pub path: String,
    pub modified: bool,
    pub active: bool,
    pub cursor: Cursor,
}

impl BufferEntry {
    /// Short name with a trailing `*` when modified.
    pub fn label(&self) -> String {
        if self.modified {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// All open slots plus the global modal state.
#[derive(Debug)]
pub struct Session {
    slots: Vec<Slot>,
    active: usize,
    pub mode: Mode,
    pub overlay: Option<Overlay>,
    pub message: Option<StatusMessage>,
    pub options: SessionOptions,
    width: u16,
    height: u16,
}

impl Session {
    /// Build a session from at least one document; an empty list yields a
    /// single NO NAME slot.
    pub fn new(documents: Vec<Document>, options: SessionOptions) -> Self {
        let mut slots: Vec<Slot> = documents.into_iter().map(Slot::new).collect();
        if slots.is_empty() {
            slots.push(Slot::new(Document::new()));
        }
        let mut session = Self {
            slots,
            active: 0,
            mode: Mode::Navigation,
            overlay: None,
            message: None,
            options,
            width: 80,
            height: 24,
        };
        session.relayout();
        session
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Mutable access to every slot; the list itself cannot change.
    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Slot {
        &self.slots[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Slot {
        &mut self.slots[self.active]
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn layout(&self) -> Layout {
        Layout::compute(self.width, self.height, self.slots.len())
    }

    /// Activate the slot showing `path`, opening it when not yet open.
    pub fn open(&mut self, path: &Path) -> Result<usize, DocumentError> {
        if let Some(index) = self.find(path) {
            debug!(target: "model.session", index, file = %path.display(), "open_reuses_slot");
            self.switch_to(index);
            return Ok(index);
        }
        let document = Document::open_with(path, self.options.tab_width)?;
        self.slots.push(Slot::new(document));
        self.active = self.slots.len() - 1;
        info!(target: "model.session", index = self.active, file = %path.display(), "slot_opened");
        self.relayout();
        Ok(self.active)
    }

    /// Append and activate an empty NO NAME slot.
    pub fn open_scratch(&mut self) -> usize {
        self.slots.push(Slot::new(Document::new()));
        self.active = self.slots.len() - 1;
        info!(target: "model.session", index = self.active, "scratch_slot_opened");
        self.relayout();
        self.active
    }

    fn find(&self, path: &Path) -> Option<usize> {
        let wanted = canonical(path);
        self.slots.iter().position(|slot| {
            slot.document
                .path()
                .is_some_and(|p| p == path || canonical(p) == wanted)
        })
    }

    /// Remove slot `index` and activate its predecessor.
    pub fn close(&mut self, index: usize) -> CloseOutcome {
        if self.slots.len() <= 1 {
            return CloseOutcome::LastSlot;
        }
        if index >= self.slots.len() {
            return CloseOutcome::Closed;
        }
        self.slots.remove(index);
        self.active = index.saturating_sub(1).min(self.slots.len() - 1);
        info!(target: "model.session", closed = index, active = self.active, "slot_closed");
        self.overlay = None;
        self.relayout();
        CloseOutcome::Closed
    }

    /// Activate `index`; `false` when no such slot exists.
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        self.active = index;
        self.scroll_to_cursor();
        true
    }

    pub fn next(&mut self) {
        let index = (self.active + 1) % self.slots.len();
        self.switch_to(index);
    }

    pub fn previous(&mut self) {
        let index = (self.active + self.slots.len() - 1) % self.slots.len();
        self.switch_to(index);
    }

    pub fn any_dirty(&self) -> bool {
        self.slots.iter().any(|s| s.document.is_dirty())
    }

    /// Record new terminal dimensions and recompute every viewport.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        debug!(target: "model.session", width, height, "resize");
        self.relayout();
    }

    fn relayout(&mut self) {
        let content = self.layout().content;
        let line_numbers = self.options.line_numbers;
        for slot in &mut self.slots {
            slot.viewport.width = usize::from(content.width);
            slot.viewport.height = usize::from(content.height);
            slot.scroll_to_cursor(line_numbers);
        }
    }

    pub fn scroll_to_cursor(&mut self) {
        let line_numbers = self.options.line_numbers;
        self.active_mut().scroll_to_cursor(line_numbers);
    }

    /// Move to line `n` (clamped) at column 1, recentering when off-screen.
    pub fn goto_line(&mut self, n: usize) {
        let slot = self.active_mut();
        let line = n.clamp(1, slot.document.line_count());
        slot.set_cursor(Cursor::new(line, 1));
        slot.viewport.recenter_on(line, slot.document.line_count(), false);
        self.scroll_to_cursor();
    }

    /// Reset horizontal scroll, go to column 1 and center the current line.
    pub fn center_and_reset(&mut self) {
        let slot = self.active_mut();
        slot.viewport.horizontal_offset = 0;
        let line = slot.cursor.line;
        slot.set_cursor(Cursor::new(line, 1));
        slot.viewport.recenter_on(line, slot.document.line_count(), true);
        self.scroll_to_cursor();
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.message = Some(message);
    }

    pub fn buffer_entries(&self) -> Vec<BufferEntry> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| BufferEntry {
                number: i + 1,
                name: slot.document.short_name(),
                path: slot.document.display_name(),
                modified: slot.document.is_dirty(),
                active: i == self.active,
                cursor: slot.cursor,
            })
            .collect()
    }
}

fn canonical(path: &Path) -> std::path::PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Document {
        let text: Vec<String> = (1..=n).map(|i| format!("line {i}")).collect();
        Document::from_text(&text.join("\n"))
    }

    fn session_with(docs: Vec<Document>) -> Session {
        let mut s = Session::new(docs, SessionOptions::default());
        s.resize(80, 24);
        s
    }

    #[test]
    fn empty_session_gets_scratch_slot() {
        let s = Session::new(Vec::new(), SessionOptions::default());
        assert_eq!(s.len(), 1);
        assert_eq!(s.active().document.short_name(), core_text::NO_NAME);
    }

    #[test]
    fn goto_line_recenters_only_when_hidden() {
        let mut s = session_with(vec![numbered(88)]);
        assert_eq!(s.active().viewport.height, 22);
        s.goto_line(77);
        assert_eq!(s.active().viewport.top_line, 65);
        assert_eq!(s.active().cursor, Cursor::new(77, 1));
        s.goto_line(1);
        s.goto_line(11);
        assert_eq!(s.active().viewport.top_line, 1);
        s.goto_line(500);
        assert_eq!(s.active().cursor.line, 88);
    }

    #[test]
    fn tab_bar_shrinks_content_height() {
        let mut s = session_with(vec![numbered(3)]);
        assert_eq!(s.active().viewport.height, 22);
        s.open_scratch();
        assert!(s.slots().iter().all(|slot| slot.viewport.height == 21));
        assert_eq!(s.close(1), CloseOutcome::Closed);
        assert_eq!(s.active().viewport.height, 22);
    }

    #[test]
    fn close_activates_previous_slot() {
        let mut s = session_with(vec![numbered(1), numbered(2), numbered(3)]);
        s.switch_to(2);
        assert_eq!(s.close(2), CloseOutcome::Closed);
        assert_eq!(s.active_index(), 1);
        s.switch_to(0);
        assert_eq!(s.close(0), CloseOutcome::Closed);
        assert_eq!(s.active_index(), 0);
        assert_eq!(s.close(0), CloseOutcome::LastSlot);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut s = session_with(vec![numbered(1), numbered(1)]);
        s.next();
        assert_eq!(s.active_index(), 1);
        s.next();
        assert_eq!(s.active_index(), 0);
        s.previous();
        assert_eq!(s.active_index(), 1);
        assert!(!s.switch_to(7));
        assert_eq!(s.active_index(), 1);
    }

    #[test]
    fn resize_keeps_cursor_visible() {
        let mut s = session_with(vec![numbered(50)]);
        s.goto_line(40);
        s.resize(40, 6);
        let slot = s.active();
        assert_eq!(slot.viewport.height, 4);
        assert!(slot.viewport.is_visible(40));
    }

    #[test]
    fn center_and_reset_recenters_visible_line() {
        let mut s = session_with(vec![numbered(88)]);
        s.active_mut().set_cursor(Cursor::new(20, 3));
        s.scroll_to_cursor();
        assert_eq!(s.active().viewport.top_line, 1);
        s.center_and_reset();
        assert_eq!(s.active().cursor, Cursor::new(20, 1));
        assert_eq!(s.active().viewport.top_line, 8);
        assert_eq!(s.active().viewport.horizontal_offset, 0);
    }

    #[test]
    fn entries_mark_modified_and_active() {
        let mut s = session_with(vec![numbered(1)]);
        s.active_mut()
            .apply(Edit::InsertChar { at: Cursor::origin(), ch: 'x' })
            .unwrap();
        s.open_scratch();
        let entries = s.buffer_entries();
        assert_eq!(entries[0].label(), format!("{}*", core_text::NO_NAME));
        assert!(!entries[0].active);
        assert!(entries[1].active);
        assert_eq!(entries[1].number, 2);
        assert!(s.any_dirty());
    }
}
