//! Modal input handling: key translation, action dispatch and command-line
//! execution.
//!
//! Flow for one key press:
//! 1. `KeyTranslator::translate` maps the key to an `Action` using the
//!    current mode, the overlay flag and any pending key (`d`, `f`, `F`,
//!    `r`).
//! 2. `dispatch` applies the action to the `Session`, routing to the
//!    `dispatcher` submodules.
//! 3. The resulting `DispatchResult` tells the runtime whether to repaint,
//!    quit or suspend.
//!
//! `handle_key` bundles the three steps and clears the previous status
//! message, which lives only until the next key press.

use core_events::KeyEvent;
use core_model::Session;

pub mod dispatcher;
mod io_ops;
mod key_translator;

pub use dispatcher::command_parser::{Command, CommandParser, WriteTarget};
pub use dispatcher::{CommandError, DispatchResult, dispatch};
pub use key_translator::KeyTranslator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    ModeChange(ModeChange),
    Edit(EditKind),
    Undo,
    Redo,
    CenterAndReset,
    NextBuffer,
    PreviousBuffer,
    CommandLine(CommandLineAction),
    Overlay(OverlayAction),
    Suspend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    WordForward,
    WordBackward,
    LineStart,
    FirstNonBlank,
    LineEnd,
    DocumentStart,
    DocumentEnd,
    ParagraphForward,
    ParagraphBackward,
    FindForward(char),
    FindBackward(char),
}

/// Transitions into and out of Insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    /// `i`
    InsertBefore,
    /// `a`
    InsertAfter,
    /// `A`
    InsertLineEnd,
    /// `I`
    InsertLineStart,
    /// `o`
    OpenBelow,
    /// `O`
    OpenAbove,
    LeaveInsert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    InsertTab,
    SplitLine,
    /// Delete before the cursor, merging lines at column 1.
    Backspace,
    /// Delete under the cursor, merging the next line at line end.
    DeleteForward,
    /// `x`
    DeleteUnder,
    ReplaceChar(char),
    ToggleCase,
    DeleteLine,
    MoveLineDown,
    MoveLineUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandLineAction {
    Start,
    Char(char),
    Backspace,
    Left,
    Right,
    Cancel,
    Execute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Up,
    Down,
    Activate,
    Replace,
    Dismiss,
}

/// Translate and dispatch one key press against `session`.
pub fn handle_key(
    session: &mut Session,
    translator: &mut KeyTranslator,
    key: &KeyEvent,
) -> DispatchResult {
    let had_message = session.message.take().is_some();
    let action = translator.translate(&session.mode, session.overlay.is_some(), key);
    let mut result = match action {
        Some(action) => dispatch(action, session),
        None => DispatchResult::clean(),
    };
    result.dirty |= had_message;
    result
}
