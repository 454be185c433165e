//! KeyTranslator: stateful key -> Action translation.
//!
//! State machine (Navigation only):
//! * Idle: single keys map directly to actions.
//! * Pending(kind): `d`, `f`, `F` or `r` was pressed and the next key
//!   completes the action (`dd`, `f<c>`, `F<c>`, `r<c>`).
//! * `<Esc>` or any key that cannot complete the pending action cancels it
//!   silently and resets to Idle.
//!
//! Insertion, CommandLine and overlays have no pending state; their keys
//! map one to one.

use crate::{Action, CommandLineAction, EditKind, ModeChange, MotionKind, OverlayAction};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::Mode;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Delete,
    FindForward,
    FindBackward,
    Replace,
}

#[derive(Debug, Default)]
pub struct KeyTranslator {
    pending: Option<Pending>,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Drop any half-typed key sequence.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn translate(&mut self, mode: &Mode, overlay: bool, key: &KeyEvent) -> Option<Action> {
        match mode {
            Mode::Insertion => {
                self.reset();
                insertion_map(key)
            }
            Mode::CommandLine(_) => {
                self.reset();
                command_line_map(key)
            }
            Mode::Navigation if overlay => {
                self.reset();
                Some(Action::Overlay(overlay_map(key)))
            }
            Mode::Navigation => self.navigation(key),
        }
    }

    fn navigation(&mut self, key: &KeyEvent) -> Option<Action> {
        if let Some(pending) = self.pending.take() {
            let completed = complete_pending(pending, key);
            trace!(target: "actions.dispatch", ?pending, ?key, completed = completed.is_some(), "pending_key");
            return completed;
        }
        if key.is_ctrl('r') {
            return Some(Action::Redo);
        }
        if key.is_ctrl('z') {
            return Some(Action::Suspend);
        }
        if key.mods.contains(KeyModifiers::CTRL) {
            return None;
        }
        let action = match key.code {
            KeyCode::Left => Action::Motion(MotionKind::Left),
            KeyCode::Right => Action::Motion(MotionKind::Right),
            KeyCode::Up => Action::Motion(MotionKind::Up),
            KeyCode::Down => Action::Motion(MotionKind::Down),
            KeyCode::Home => Action::Motion(MotionKind::LineStart),
            KeyCode::End => Action::Motion(MotionKind::LineEnd),
            KeyCode::Tab => Action::NextBuffer,
            KeyCode::BackTab => Action::PreviousBuffer,
            KeyCode::Char(c) => return self.navigation_char(c),
            KeyCode::Enter
            | KeyCode::Esc
            | KeyCode::Backspace
            | KeyCode::Delete => return None,
        };
        Some(action)
    }

    fn navigation_char(&mut self, c: char) -> Option<Action> {
        let action = match c {
            'h' => Action::Motion(MotionKind::Left),
            'l' => Action::Motion(MotionKind::Right),
            'j' => Action::Motion(MotionKind::Down),
            'k' => Action::Motion(MotionKind::Up),
            'w' => Action::Motion(MotionKind::WordForward),
            'b' => Action::Motion(MotionKind::WordBackward),
            '0' => Action::Motion(MotionKind::LineStart),
            '^' => Action::Motion(MotionKind::FirstNonBlank),
            '$' => Action::Motion(MotionKind::LineEnd),
            'g' => Action::Motion(MotionKind::DocumentStart),
            'G' => Action::Motion(MotionKind::DocumentEnd),
            '{' => Action::Motion(MotionKind::ParagraphBackward),
            '}' => Action::Motion(MotionKind::ParagraphForward),
            'i' => Action::ModeChange(ModeChange::InsertBefore),
            'a' => Action::ModeChange(ModeChange::InsertAfter),
            'A' => Action::ModeChange(ModeChange::InsertLineEnd),
            'I' => Action::ModeChange(ModeChange::InsertLineStart),
            'o' => Action::ModeChange(ModeChange::OpenBelow),
            'O' => Action::ModeChange(ModeChange::OpenAbove),
            'x' => Action::Edit(EditKind::DeleteUnder),
            '~' => Action::Edit(EditKind::ToggleCase),
            'J' => Action::Edit(EditKind::MoveLineDown),
            'K' => Action::Edit(EditKind::MoveLineUp),
            'u' => Action::Undo,
            'U' => Action::Redo,
            'z' => Action::CenterAndReset,
            ';' => Action::CommandLine(CommandLineAction::Start),
            'd' => return self.hold(Pending::Delete),
            'f' => return self.hold(Pending::FindForward),
            'F' => return self.hold(Pending::FindBackward),
            'r' => return self.hold(Pending::Replace),
            _ => return None,
        };
        Some(action)
    }

    fn hold(&mut self, pending: Pending) -> Option<Action> {
        self.pending = Some(pending);
        None
    }
}

fn complete_pending(pending: Pending, key: &KeyEvent) -> Option<Action> {
    if key.mods.contains(KeyModifiers::CTRL) {
        return None;
    }
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    match pending {
        Pending::Delete if c == 'd' => Some(Action::Edit(EditKind::DeleteLine)),
        Pending::Delete => None,
        Pending::FindForward => Some(Action::Motion(MotionKind::FindForward(c))),
        Pending::FindBackward => Some(Action::Motion(MotionKind::FindBackward(c))),
        Pending::Replace => Some(Action::Edit(EditKind::ReplaceChar(c))),
    }
}

fn insertion_map(key: &KeyEvent) -> Option<Action> {
    if key.mods.contains(KeyModifiers::CTRL) {
        return None;
    }
    let action = match key.code {
        KeyCode::Esc => Action::ModeChange(ModeChange::LeaveInsert),
        KeyCode::Enter => Action::Edit(EditKind::SplitLine),
        KeyCode::Backspace => Action::Edit(EditKind::Backspace),
        KeyCode::Delete => Action::Edit(EditKind::DeleteForward),
        KeyCode::Tab => Action::Edit(EditKind::InsertTab),
        KeyCode::Left => Action::Motion(MotionKind::Left),
        KeyCode::Right => Action::Motion(MotionKind::Right),
        KeyCode::Up => Action::Motion(MotionKind::Up),
        KeyCode::Down => Action::Motion(MotionKind::Down),
        KeyCode::Char(c) => Action::Edit(EditKind::InsertChar(c)),
        KeyCode::BackTab | KeyCode::Home | KeyCode::End => return None,
    };
    Some(action)
}

fn command_line_map(key: &KeyEvent) -> Option<Action> {
    if key.mods.contains(KeyModifiers::CTRL) {
        return None;
    }
    let action = match key.code {
        KeyCode::Esc => CommandLineAction::Cancel,
        KeyCode::Enter => CommandLineAction::Execute,
        KeyCode::Backspace => CommandLineAction::Backspace,
        KeyCode::Left => CommandLineAction::Left,
        KeyCode::Right => CommandLineAction::Right,
        KeyCode::Char(c) => CommandLineAction::Char(c),
        _ => return None,
    };
    Some(Action::CommandLine(action))
}

fn overlay_map(key: &KeyEvent) -> OverlayAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => OverlayAction::Down,
        KeyCode::Char('k') | KeyCode::Up => OverlayAction::Up,
        KeyCode::Char('r') => OverlayAction::Replace,
        KeyCode::Enter => OverlayAction::Activate,
        _ => OverlayAction::Dismiss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::CommandLine;
    use core_text::Cursor;

    fn nav(tr: &mut KeyTranslator, c: char) -> Option<Action> {
        tr.translate(&Mode::Navigation, false, &KeyEvent::from(c))
    }

    #[test]
    fn dd_needs_two_keys() {
        let mut tr = KeyTranslator::new();
        assert_eq!(nav(&mut tr, 'd'), None);
        assert!(tr.has_pending());
        assert_eq!(nav(&mut tr, 'd'), Some(Action::Edit(EditKind::DeleteLine)));
        assert!(!tr.has_pending());
    }

    #[test]
    fn pending_cancelled_by_other_key() {
        let mut tr = KeyTranslator::new();
        nav(&mut tr, 'd');
        assert_eq!(nav(&mut tr, 'j'), None);
        assert_eq!(nav(&mut tr, 'j'), Some(Action::Motion(MotionKind::Down)));
    }

    #[test]
    fn esc_cancels_pending() {
        let mut tr = KeyTranslator::new();
        nav(&mut tr, 'r');
        let esc = KeyEvent::from(KeyCode::Esc);
        assert_eq!(tr.translate(&Mode::Navigation, false, &esc), None);
        assert_eq!(nav(&mut tr, 'x'), Some(Action::Edit(EditKind::DeleteUnder)));
    }

    #[test]
    fn find_and_replace_take_any_char() {
        let mut tr = KeyTranslator::new();
        nav(&mut tr, 'f');
        assert_eq!(nav(&mut tr, 'd'), Some(Action::Motion(MotionKind::FindForward('d'))));
        nav(&mut tr, 'F');
        assert_eq!(nav(&mut tr, ';'), Some(Action::Motion(MotionKind::FindBackward(';'))));
        nav(&mut tr, 'r');
        assert_eq!(nav(&mut tr, 'Q'), Some(Action::Edit(EditKind::ReplaceChar('Q'))));
    }

    #[test]
    fn ctrl_keys_in_navigation() {
        let mut tr = KeyTranslator::new();
        assert_eq!(
            tr.translate(&Mode::Navigation, false, &KeyEvent::ctrl('r')),
            Some(Action::Redo)
        );
        assert_eq!(
            tr.translate(&Mode::Navigation, false, &KeyEvent::ctrl('z')),
            Some(Action::Suspend)
        );
        assert_eq!(
            tr.translate(&Mode::Navigation, false, &KeyEvent::ctrl('x')),
            None
        );
    }

    #[test]
    fn insertion_keys_insert_literally() {
        let mut tr = KeyTranslator::new();
        assert_eq!(
            tr.translate(&Mode::Insertion, false, &KeyEvent::from('d')),
            Some(Action::Edit(EditKind::InsertChar('d')))
        );
        assert_eq!(
            tr.translate(&Mode::Insertion, false, &KeyEvent::from(KeyCode::Esc)),
            Some(Action::ModeChange(ModeChange::LeaveInsert))
        );
    }

    #[test]
    fn command_line_keys() {
        let mut tr = KeyTranslator::new();
        let mode = Mode::CommandLine(CommandLine::new(Cursor::origin()));
        assert_eq!(
            tr.translate(&mode, false, &KeyEvent::from('q')),
            Some(Action::CommandLine(CommandLineAction::Char('q')))
        );
        assert_eq!(
            tr.translate(&mode, false, &KeyEvent::from(KeyCode::Enter)),
            Some(Action::CommandLine(CommandLineAction::Execute))
        );
    }

    #[test]
    fn overlay_consumes_everything() {
        let mut tr = KeyTranslator::new();
        let t = |tr: &mut KeyTranslator, k: KeyEvent| tr.translate(&Mode::Navigation, true, &k);
        assert_eq!(t(&mut tr, 'j'.into()), Some(Action::Overlay(OverlayAction::Down)));
        assert_eq!(t(&mut tr, KeyCode::Up.into()), Some(Action::Overlay(OverlayAction::Up)));
        assert_eq!(t(&mut tr, KeyCode::Enter.into()), Some(Action::Overlay(OverlayAction::Activate)));
        assert_eq!(t(&mut tr, 'x'.into()), Some(Action::Overlay(OverlayAction::Dismiss)));
    }
}
