//! Text edit action handling.
//!
//! Every mutation is expressed as one or more primitive `Edit`s applied
//! through the active slot's undo history, so each step is undoable on its
//! own. A read-only document rejects the first edit and nothing changes.

use super::{DispatchResult, report_undo_error};
use crate::EditKind;
use core_model::{Session, Slot};
use core_state::{Edit, UndoError};
use core_text::{Cursor, motion};

pub(crate) fn handle_edit(kind: EditKind, session: &mut Session) -> DispatchResult {
    let tab_width = session.options.tab_width;
    let slot = session.active_mut();
    let before = slot.cursor;
    let outcome = match kind {
        EditKind::InsertChar(ch) => insert_char(slot, ch),
        EditKind::InsertTab => (0..tab_width).try_for_each(|_| insert_char(slot, ' ')),
        EditKind::SplitLine => slot.apply(Edit::SplitLine { at: slot.cursor }),
        EditKind::Backspace => backspace(slot),
        EditKind::DeleteForward => delete_forward(slot),
        EditKind::DeleteUnder => {
            let edit = Edit::delete_char(&slot.document, slot.cursor);
            apply_if(slot, edit)
        }
        EditKind::ReplaceChar(ch) => {
            let edit = Edit::replace_char(&slot.document, slot.cursor, ch);
            apply_if(slot, edit)
        }
        EditKind::ToggleCase => toggle_case(slot),
        EditKind::DeleteLine => delete_line(slot),
        EditKind::MoveLineDown => move_line(slot, true),
        EditKind::MoveLineUp => move_line(slot, false),
    };
    let after = slot.cursor;
    tracing::trace!(target: "actions.dispatch", ?kind, line = before.line, column = before.column, to_line = after.line, to_column = after.column, "edit");
    match outcome {
        Ok(()) => DispatchResult::dirty(),
        Err(e) => report_undo_error(session, e),
    }
}

fn insert_char(slot: &mut Slot, ch: char) -> Result<(), UndoError> {
    slot.apply(Edit::InsertChar { at: slot.cursor, ch })
}

fn apply_if(slot: &mut Slot, edit: Option<Edit>) -> Result<(), UndoError> {
    match edit {
        Some(edit) => slot.apply(edit),
        None => Ok(()),
    }
}

fn backspace(slot: &mut Slot) -> Result<(), UndoError> {
    let cur = slot.cursor;
    if cur.column > 1 {
        let edit = Edit::delete_char(&slot.document, Cursor::new(cur.line, cur.column - 1));
        apply_if(slot, edit)
    } else if cur.line > 1 {
        let edit = Edit::merge_lines(&slot.document, cur.line - 1);
        apply_if(slot, edit)
    } else {
        Ok(())
    }
}

fn delete_forward(slot: &mut Slot) -> Result<(), UndoError> {
    let cur = slot.cursor;
    if cur.column <= slot.document.line_len(cur.line) {
        let edit = Edit::delete_char(&slot.document, cur);
        apply_if(slot, edit)
    } else {
        let merge = Edit::merge_lines(&slot.document, cur.line);
        apply_if(slot, merge)
    }
}

fn toggle_case(slot: &mut Slot) -> Result<(), UndoError> {
    if slot.document.is_read_only() {
        return Err(core_text::DocumentError::ReadOnly.into());
    }
    let cur = slot.cursor;
    let edit = Edit::toggle_case(&slot.document, cur);
    apply_if(slot, edit)?;
    let mut next = cur;
    motion::right(&slot.document, &mut next);
    slot.set_cursor(next);
    Ok(())
}

/// Remove the current line; the only line is emptied instead.
fn delete_line(slot: &mut Slot) -> Result<(), UndoError> {
    let line = slot.cursor.line;
    if let Some(edit) = Edit::remove_line(&slot.document, line) {
        slot.apply(edit)?;
        let mut cur = slot.cursor;
        motion::first_non_blank(&slot.document, &mut cur);
        slot.set_cursor(cur);
        return Ok(());
    }
    while let Some(edit) = Edit::delete_char(&slot.document, Cursor::new(line, 1)) {
        slot.apply(edit)?;
    }
    slot.set_cursor(Cursor::new(line, 1));
    Ok(())
}

fn move_line(slot: &mut Slot, down: bool) -> Result<(), UndoError> {
    let cur = slot.cursor;
    let to = if down {
        cur.line + 1
    } else {
        cur.line.saturating_sub(1)
    };
    if to == 0 || to > slot.document.line_count() {
        return Ok(());
    }
    slot.apply(Edit::MoveLine { from: cur.line, to })?;
    slot.set_cursor(Cursor::new(to, cur.column));
    Ok(())
}
