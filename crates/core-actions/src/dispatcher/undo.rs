//! Undo / Redo dispatch against the active slot's history.

use super::{DispatchResult, report_undo_error};
use core_model::Session;

pub(crate) fn handle_undo(session: &mut Session) -> DispatchResult {
    let slot = session.active_mut();
    let before = slot.document.line_count();
    match slot.undo() {
        Ok(()) => {
            let after = slot.document.line_count();
            tracing::trace!(target: "actions.dispatch", op = "undo", lines_changed = (before != after), "undo");
            DispatchResult::dirty()
        }
        Err(e) => report_undo_error(session, e),
    }
}

pub(crate) fn handle_redo(session: &mut Session) -> DispatchResult {
    let slot = session.active_mut();
    let before = slot.document.line_count();
    match slot.redo() {
        Ok(()) => {
            let after = slot.document.line_count();
            tracing::trace!(target: "actions.dispatch", op = "redo", lines_changed = (before != after), "redo");
            DispatchResult::dirty()
        }
        Err(e) => report_undo_error(session, e),
    }
}
