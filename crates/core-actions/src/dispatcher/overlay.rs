//! Buffer list and search result panels.
//!
//! The translator only routes j/k/Enter/r here; any other key has already
//! been mapped to `Dismiss`.

use super::{DispatchResult, report_undo_error};
use crate::OverlayAction;
use core_model::{Session, Slot};
use core_state::{Edit, Overlay, SearchResults, StatusMessage, UndoError};
use core_text::{Cursor, DocumentError};
use tracing::{debug, info};

pub(crate) fn handle_overlay(action: OverlayAction, session: &mut Session) -> DispatchResult {
    let Some(overlay) = session.overlay.take() else {
        return DispatchResult::clean();
    };
    match action {
        OverlayAction::Up | OverlayAction::Down => {
            let mut overlay = overlay;
            let len = match &overlay {
                Overlay::BufferList { .. } => session.len(),
                Overlay::SearchResults(r) => r.matches.len(),
            };
            overlay.step(matches!(action, OverlayAction::Down), len);
            session.overlay = Some(overlay);
        }
        OverlayAction::Activate => match overlay {
            Overlay::BufferList { selected } => {
                session.switch_to(selected);
            }
            Overlay::SearchResults(results) => {
                if let Some(&at) = results.matches.get(results.selected) {
                    let slot = session.active_mut();
                    slot.set_cursor(at);
                    let count = slot.document.line_count();
                    slot.viewport.recenter_on(at.line, count, false);
                }
            }
        },
        OverlayAction::Replace => {
            if let Overlay::SearchResults(results) = overlay {
                return replace_all(results, session);
            }
        }
        OverlayAction::Dismiss => {
            debug!(target: "actions.dispatch", "overlay_dismissed");
        }
    }
    DispatchResult::dirty()
}

/// Replace every match, last first, so earlier positions stay valid.
fn replace_all(results: SearchResults, session: &mut Session) -> DispatchResult {
    let pattern_len = results.pattern.chars().count();
    let slot = session.active_mut();
    let replaced = results
        .matches
        .iter()
        .rev()
        .try_for_each(|&at| replace_one(slot, at, pattern_len, &results.replacement));
    if let Err(e) = replaced {
        return report_undo_error(session, e);
    }
    if let Some(&first) = results.matches.first() {
        session.active_mut().set_cursor(first);
    }
    info!(
        target: "actions.command",
        pattern = %results.pattern,
        count = results.matches.len(),
        "replaced"
    );
    session.set_message(StatusMessage::success(format!(
        "Replaced {} matches",
        results.matches.len()
    )));
    DispatchResult::dirty()
}

fn replace_one(
    slot: &mut Slot,
    at: Cursor,
    pattern_len: usize,
    replacement: &str,
) -> Result<(), UndoError> {
    for _ in 0..pattern_len {
        let ch = slot.document.char_at(at).ok_or(DocumentError::OutOfBounds {
            line: at.line,
            column: at.column,
        })?;
        slot.apply(Edit::DeleteChar { at, ch })?;
    }
    for (i, ch) in replacement.chars().enumerate() {
        slot.apply(Edit::InsertChar {
            at: Cursor::new(at.line, at.column + i),
            ch,
        })?;
    }
    Ok(())
}
