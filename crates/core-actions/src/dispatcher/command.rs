//! Command line editing and command execution.
//!
//! Editing happens inside `Mode::CommandLine`; leaving the mode (cancel,
//! empty backspace or execute) drops the text. On execute the mode returns
//! to Navigation *before* the command runs, so commands that relocate the
//! cursor or open overlays act on a Navigation session.

use super::command_parser::{Command, CommandParser, WriteTarget};
use super::{CommandError, DispatchResult};
use crate::CommandLineAction;
use crate::io_ops::{write_all, write_document};
use core_model::{CloseOutcome, Session};
use core_state::{CommandLine, Mode, Overlay, SearchResults, StatusMessage};
use tracing::{debug, info};

pub(crate) fn handle_command_line(action: CommandLineAction, session: &mut Session) -> DispatchResult {
    if let CommandLineAction::Start = action {
        let entry = session.active().cursor;
        session.mode = Mode::CommandLine(CommandLine::new(entry));
        return DispatchResult::dirty();
    }
    let Mode::CommandLine(cl) = &mut session.mode else {
        return DispatchResult::clean();
    };
    match action {
        CommandLineAction::Start => {}
        CommandLineAction::Char(ch) => cl.insert(ch),
        CommandLineAction::Backspace => {
            if !cl.backspace() {
                let entry = cl.entry_cursor();
                leave(session, entry);
            }
        }
        CommandLineAction::Left => cl.move_left(),
        CommandLineAction::Right => cl.move_right(),
        CommandLineAction::Cancel => {
            let entry = cl.entry_cursor();
            leave(session, entry);
        }
        CommandLineAction::Execute => {
            let text = cl.text().to_string();
            let entry = cl.entry_cursor();
            leave(session, entry);
            return execute_text(&text, session);
        }
    }
    DispatchResult::dirty()
}

fn leave(session: &mut Session, entry: core_text::Cursor) {
    session.mode = Mode::Navigation;
    session.active_mut().set_cursor(entry);
}

/// Parse and run `text`, turning any failure into an Alert message.
pub(crate) fn execute_text(text: &str, session: &mut Session) -> DispatchResult {
    let parsed = CommandParser::parse(text);
    info!(target: "actions.command", raw = text, parsed = ?parsed.as_ref().ok(), "execute");
    match parsed.and_then(|cmd| execute(cmd, session)) {
        Ok(result) => result,
        Err(e) => {
            debug!(target: "actions.command", error = %e, "command_failed");
            session.set_message(StatusMessage::alert(e.to_string()));
            DispatchResult::dirty()
        }
    }
}

fn execute(command: Command, session: &mut Session) -> Result<DispatchResult, CommandError> {
    match command {
        Command::Quit { force } => quit_active(session, force),
        Command::QuitAll { force } => {
            if !force && session.any_dirty() {
                return Err(CommandError::UnsavedChanges);
            }
            Ok(DispatchResult::quit())
        }
        Command::Write {
            target: WriteTarget::Active,
            path,
        } => {
            let bytes = write_document(&mut session.active_mut().document, path.as_deref())?;
            session.set_message(StatusMessage::success(format!("Saved {bytes} bytes")));
            Ok(DispatchResult::dirty())
        }
        Command::Write {
            target: WriteTarget::All,
            ..
        } => {
            let report = write_all(session);
            if !report.failures.is_empty() {
                return Err(CommandError::PartialWrite {
                    saved: report.saved,
                    failed: report.failures.len(),
                    details: report.failure_details(),
                });
            }
            session.set_message(StatusMessage::success(format!(
                "Saved {} buffers",
                report.saved
            )));
            Ok(DispatchResult::dirty())
        }
        Command::WriteQuit => {
            write_document(&mut session.active_mut().document, None)?;
            quit_active(session, true)
        }
        Command::Edit { path } => {
            session.open(&path)?;
            Ok(DispatchResult::dirty())
        }
        Command::New => {
            session.open_scratch();
            Ok(DispatchResult::dirty())
        }
        Command::SwitchBuffer { index } => {
            if index == 0 || !session.switch_to(index - 1) {
                return Err(CommandError::UnknownBuffer);
            }
            Ok(DispatchResult::dirty())
        }
        Command::NextBuffer => {
            session.next();
            Ok(DispatchResult::dirty())
        }
        Command::PreviousBuffer => {
            session.previous();
            Ok(DispatchResult::dirty())
        }
        Command::GotoLine { n } => {
            session.goto_line(n);
            Ok(DispatchResult::dirty())
        }
        Command::ListBuffers => {
            session.overlay = Some(Overlay::BufferList {
                selected: session.active_index(),
            });
            Ok(DispatchResult::dirty())
        }
        Command::SearchReplace {
            pattern,
            replacement,
        } => {
            let matches = session.active().document.find_all(&pattern);
            if matches.is_empty() {
                return Err(CommandError::PatternNotFound);
            }
            debug!(target: "actions.command", pattern = %pattern, count = matches.len(), "search_results");
            session.overlay = Some(Overlay::SearchResults(SearchResults {
                pattern,
                replacement,
                matches,
                selected: 0,
            }));
            Ok(DispatchResult::dirty())
        }
        Command::Ping => {
            session.set_message(StatusMessage::info("pong"));
            Ok(DispatchResult::dirty())
        }
        Command::Unknown { .. } => Err(CommandError::Unknown),
    }
}

fn quit_active(session: &mut Session, force: bool) -> Result<DispatchResult, CommandError> {
    if !force && session.active().document.is_dirty() {
        return Err(CommandError::UnsavedChanges);
    }
    match session.close(session.active_index()) {
        CloseOutcome::LastSlot => Ok(DispatchResult::quit()),
        CloseOutcome::Closed => Ok(DispatchResult::dirty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::SessionOptions;
    use core_state::Severity;
    use core_text::{Cursor, Document};

    fn session(text: &str) -> Session {
        Session::new(vec![Document::from_text(text)], SessionOptions::default())
    }

    fn type_command(session: &mut Session, text: &str) -> DispatchResult {
        handle_command_line(CommandLineAction::Start, session);
        for ch in text.chars() {
            handle_command_line(CommandLineAction::Char(ch), session);
        }
        handle_command_line(CommandLineAction::Execute, session)
    }

    #[test]
    fn cancel_restores_entry_cursor() {
        let mut s = session("abc\ndef");
        s.active_mut().set_cursor(Cursor::new(2, 2));
        handle_command_line(CommandLineAction::Start, &mut s);
        handle_command_line(CommandLineAction::Char('7'), &mut s);
        handle_command_line(CommandLineAction::Cancel, &mut s);
        assert_eq!(s.mode, Mode::Navigation);
        assert_eq!(s.active().cursor, Cursor::new(2, 2));
    }

    #[test]
    fn backspace_on_empty_exits() {
        let mut s = session("abc");
        handle_command_line(CommandLineAction::Start, &mut s);
        handle_command_line(CommandLineAction::Char('w'), &mut s);
        handle_command_line(CommandLineAction::Backspace, &mut s);
        assert!(matches!(s.mode, Mode::CommandLine(_)));
        handle_command_line(CommandLineAction::Backspace, &mut s);
        assert_eq!(s.mode, Mode::Navigation);
    }

    #[test]
    fn quit_clean_single_buffer_exits() {
        let mut s = session("abc");
        assert!(type_command(&mut s, "q").quit);
    }

    #[test]
    fn quit_all_guards_modified_buffers() {
        let mut s = session("abc");
        s.open_scratch();
        s.switch_to(0);
        s.active_mut()
            .apply(core_state::Edit::InsertChar { at: Cursor::origin(), ch: 'x' })
            .unwrap();
        s.switch_to(1);
        let r = type_command(&mut s, "qa");
        assert!(!r.quit);
        assert_eq!(s.message.as_ref().unwrap().severity, Severity::Alert);
        assert!(type_command(&mut s, "qa!").quit);
    }

    #[test]
    fn switch_buffer_is_one_based() {
        let mut s = session("abc");
        s.open_scratch();
        type_command(&mut s, "b 1");
        assert_eq!(s.active_index(), 0);
        type_command(&mut s, "b 3");
        assert_eq!(s.active_index(), 0);
        assert_eq!(s.message.as_ref().unwrap().text, "Unknown bufnr provided");
    }

    #[test]
    fn write_without_name_reports() {
        let mut s = session("abc");
        type_command(&mut s, "w");
        let msg = s.message.as_ref().unwrap();
        assert_eq!(msg.text, "No file name");
        assert_eq!(msg.severity, Severity::Alert);
    }

    #[test]
    fn ping_pongs() {
        let mut s = session("");
        type_command(&mut s, "ping");
        assert_eq!(s.message.as_ref().unwrap().text, "pong");
    }

    #[test]
    fn search_opens_overlay_or_reports() {
        let mut s = session("foo bar foo");
        type_command(&mut s, "s|foo|baz|");
        match &s.overlay {
            Some(Overlay::SearchResults(r)) => {
                assert_eq!(r.matches, vec![Cursor::new(1, 1), Cursor::new(1, 9)]);
                assert_eq!(r.replacement, "baz");
            }
            other => panic!("expected search results, got {other:?}"),
        }
        s.overlay = None;
        type_command(&mut s, "s|zzz|y|");
        assert!(s.overlay.is_none());
        assert_eq!(s.message.as_ref().unwrap().text, "Pattern not found");
    }
}
