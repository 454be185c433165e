//! Mode transition handling (Navigation <-> Insertion).

use super::{DispatchResult, report_undo_error};
use crate::ModeChange;
use core_model::Session;
use core_state::{Edit, Mode};
use core_text::{Cursor, motion};

pub(crate) fn handle_mode_change(mc: ModeChange, session: &mut Session) -> DispatchResult {
    let slot = session.active_mut();
    let cur = slot.cursor;
    let len = slot.document.line_len(cur.line);
    match mc {
        ModeChange::InsertBefore => {}
        ModeChange::InsertAfter => {
            slot.set_cursor(Cursor::new(cur.line, (cur.column + 1).min(len + 1)));
        }
        ModeChange::InsertLineEnd => slot.set_cursor(Cursor::new(cur.line, len + 1)),
        ModeChange::InsertLineStart => {
            let mut c = cur;
            motion::first_non_blank(&slot.document, &mut c);
            slot.set_cursor(c);
        }
        ModeChange::OpenBelow | ModeChange::OpenAbove => {
            let line = if mc == ModeChange::OpenBelow {
                cur.line + 1
            } else {
                cur.line
            };
            let edit = Edit::InsertLine {
                line,
                text: String::new(),
            };
            if let Err(e) = slot.apply(edit) {
                return report_undo_error(session, e);
            }
        }
        ModeChange::LeaveInsert => {
            if cur.column > 1 {
                slot.set_cursor(Cursor::new(cur.line, cur.column - 1));
            }
            session.mode = Mode::Navigation;
            tracing::trace!(target: "actions.dispatch", line = cur.line, column = cur.column, "leave_insert");
            return DispatchResult::dirty();
        }
    }
    session.mode = Mode::Insertion;
    tracing::trace!(target: "actions.dispatch", ?mc, "enter_insert");
    DispatchResult::dirty()
}
