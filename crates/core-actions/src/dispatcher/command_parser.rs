//! Structured command line parsing.
//!
//! Converts confirmed command-line text (the `;` prompt is not part of it)
//! into a closed `Command` enum. Parsing is pure: no session access, no
//! side effects. Malformed arguments of a known command become a
//! `CommandError`; an unrecognized command name becomes `Command::Unknown`.
//!
//! Grammar:
//! * `q`, `q!`, `qa`, `qa!`
//! * `w [path]`, `wa`, `wq`, `x`
//! * `e <path>`, `new`
//! * `b <n>` (1-based), `bn`, `bp`, `ls`
//! * `<n>` goto line
//! * `s<d>pattern<d>replacement<d>` with any punctuation delimiter `<d>`
//! * `ping`

use super::CommandError;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Active,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit { force: bool },
    QuitAll { force: bool },
    Write { target: WriteTarget, path: Option<PathBuf> },
    WriteQuit,
    Edit { path: PathBuf },
    New,
    SwitchBuffer { index: usize },
    NextBuffer,
    PreviousBuffer,
    GotoLine { n: usize },
    ListBuffers,
    SearchReplace { pattern: String, replacement: String },
    Ping,
    Unknown { raw: String },
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> Result<Command, CommandError> {
        let s = raw.trim();
        if let Some(cmd) = parse_substitute(s) {
            return cmd;
        }
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            // Overlong numbers saturate; the line is clamped anyway.
            let n = s.parse().unwrap_or(usize::MAX);
            return Ok(Command::GotoLine { n });
        }
        let (name, arg) = match s.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (s, ""),
        };
        let arg = (!arg.is_empty()).then_some(arg);
        let cmd = match (name, arg) {
            ("q", None) => Command::Quit { force: false },
            ("q!", None) => Command::Quit { force: true },
            ("qa", None) => Command::QuitAll { force: false },
            ("qa!", None) => Command::QuitAll { force: true },
            ("w", path) => Command::Write {
                target: WriteTarget::Active,
                path: path.map(PathBuf::from),
            },
            ("wa", None) => Command::Write {
                target: WriteTarget::All,
                path: None,
            },
            ("wq" | "x", None) => Command::WriteQuit,
            ("e", Some(path)) => Command::Edit {
                path: PathBuf::from(path),
            },
            ("e" | "b", None) => return Err(CommandError::MissingArgument),
            ("b", Some(n)) => match n.parse::<usize>() {
                Ok(index) if index >= 1 => Command::SwitchBuffer { index },
                _ => return Err(CommandError::UnknownBuffer),
            },
            ("bn", None) => Command::NextBuffer,
            ("bp", None) => Command::PreviousBuffer,
            ("new", None) => Command::New,
            ("ls", None) => Command::ListBuffers,
            ("ping", None) => Command::Ping,
            _ => Command::Unknown { raw: s.to_string() },
        };
        Ok(cmd)
    }
}

/// `s|pattern|replacement|`; the delimiter is the character after `s`.
fn parse_substitute(s: &str) -> Option<Result<Command, CommandError>> {
    let rest = s.strip_prefix('s')?;
    let delim = rest.chars().next()?;
    if delim.is_alphanumeric() || delim.is_whitespace() {
        return None;
    }
    let body = &rest[delim.len_utf8()..];
    let mut parts = body.splitn(3, delim);
    let pattern = parts.next().unwrap_or_default();
    let replacement = parts.next().unwrap_or_default();
    if pattern.is_empty() {
        return Some(Err(CommandError::PatternRequired));
    }
    Some(Ok(Command::SearchReplace {
        pattern: pattern.to_string(),
        replacement: replacement.to_string(),
    }))
}
