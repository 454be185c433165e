//! Motion sub-dispatch (cursor movement).
//!
//! Vertical motions use the slot's sticky column; every other motion
//! resets it to the column it lands on.

use super::DispatchResult;
use crate::MotionKind;
use core_model::Session;
use core_text::motion;

pub(crate) fn handle_motion(kind: MotionKind, session: &mut Session) -> DispatchResult {
    let slot = session.active_mut();
    let before = slot.cursor;
    let doc = &slot.document;
    let mut cur = slot.cursor;
    match kind {
        MotionKind::Up => motion::up(doc, &mut cur, slot.desired_column),
        MotionKind::Down => motion::down(doc, &mut cur, slot.desired_column),
        MotionKind::Left => motion::left(doc, &mut cur),
        MotionKind::Right => motion::right(doc, &mut cur),
        MotionKind::WordForward => motion::next_word(doc, &mut cur),
        MotionKind::WordBackward => motion::previous_word(doc, &mut cur),
        MotionKind::LineStart => motion::line_start(doc, &mut cur),
        MotionKind::FirstNonBlank => motion::first_non_blank(doc, &mut cur),
        MotionKind::LineEnd => motion::line_end(doc, &mut cur),
        MotionKind::DocumentStart => motion::document_start(doc, &mut cur),
        MotionKind::DocumentEnd => motion::document_end(doc, &mut cur),
        MotionKind::ParagraphForward => motion::next_paragraph(doc, &mut cur),
        MotionKind::ParagraphBackward => motion::previous_paragraph(doc, &mut cur),
        MotionKind::FindForward(c) => motion::find_char_forward(doc, &mut cur, c),
        MotionKind::FindBackward(c) => motion::find_char_backward(doc, &mut cur, c),
    }
    if matches!(kind, MotionKind::Up | MotionKind::Down) {
        slot.cursor = cur;
    } else {
        slot.set_cursor(cur);
    }
    tracing::trace!(target: "actions.dispatch", ?kind, from_line = before.line, from_col = before.column, to_line = cur.line, to_col = cur.column, "motion");
    if cur == before {
        DispatchResult::clean()
    } else {
        DispatchResult::dirty()
    }
}
