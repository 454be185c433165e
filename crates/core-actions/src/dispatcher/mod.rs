//! Dispatcher applying `Action` to the `Session`.
//!
//! Submodules:
//! * `motion`  - cursor movement and the sticky column
//! * `mode`    - Navigation <-> Insertion transitions
//! * `edit`    - text mutation through the undo history
//! * `undo`    - undo / redo
//! * `command` - command-line editing and command execution
//! * `command_parser` - command-line text -> `Command`
//! * `overlay` - buffer list and search result panels
//!
//! Every handler reports user-facing failures by setting an Alert status
//! message; nothing propagates out of `dispatch`. After a handler runs the
//! active slot is scrolled so its cursor stays visible.

use crate::Action;
use core_model::Session;
use core_state::{StatusMessage, UndoError};
use core_text::DocumentError;
use thiserror::Error;
use tracing::trace;

mod command;
pub mod command_parser;
mod edit;
mod mode;
mod motion;
mod overlay;
mod undo;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// The runtime should stop the process (job control) and repaint on resume.
    pub suspend: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            suspend: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            suspend: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            suspend: false,
        }
    }
    pub fn suspend() -> Self {
        Self {
            dirty: true,
            quit: false,
            suspend: true,
        }
    }
}

/// User-facing command failures, rendered as Alert messages.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command")]
    Unknown,
    #[error("Argument required")]
    MissingArgument,
    #[error("Unknown bufnr provided")]
    UnknownBuffer,
    #[error("Unsaved changes. Use `;q!` to discard")]
    UnsavedChanges,
    #[error("Pattern not found")]
    PatternNotFound,
    #[error("Pattern required")]
    PatternRequired,
    #[error("Saved {saved} buffers; {failed} failed: {details}")]
    PartialWrite {
        saved: usize,
        failed: usize,
        details: String,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Apply an action to the session.
pub fn dispatch(action: Action, session: &mut Session) -> DispatchResult {
    trace!(target: "actions.dispatch", ?action, "dispatch");
    let result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, session),
        Action::ModeChange(mc) => mode::handle_mode_change(mc, session),
        Action::Edit(kind) => edit::handle_edit(kind, session),
        Action::Undo => undo::handle_undo(session),
        Action::Redo => undo::handle_redo(session),
        Action::CenterAndReset => {
            session.center_and_reset();
            DispatchResult::dirty()
        }
        Action::NextBuffer => {
            session.next();
            DispatchResult::dirty()
        }
        Action::PreviousBuffer => {
            session.previous();
            DispatchResult::dirty()
        }
        Action::CommandLine(a) => command::handle_command_line(a, session),
        Action::Overlay(a) => overlay::handle_overlay(a, session),
        Action::Suspend => DispatchResult::suspend(),
    };
    if result.dirty && !result.quit {
        session.scroll_to_cursor();
    }
    result
}

/// Surface an edit failure; undo boundaries stay silent.
pub(crate) fn report_undo_error(session: &mut Session, err: UndoError) -> DispatchResult {
    if err.is_boundary() {
        return DispatchResult::clean();
    }
    session.set_message(StatusMessage::alert(err.to_string()));
    DispatchResult::dirty()
}
