//! Terminal writer: translates a `Frame` into crossterm commands.
//!
//! Invariants:
//! * Commands preserve ordering; nothing is flushed mid-frame.
//! * Every row starts with an absolute `MoveTo(0, y)`, so a terminal that
//!   wraps differently cannot shift later rows.
//! * Consecutive cells with the same style are printed as one run.
//! * The cursor is hidden while painting and shown at the frame cursor at
//!   the end; a frame without a cursor leaves it hidden.

use crate::{CellFlags, Color, Frame, Style};
use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{
        Attribute, Color as TermColor, Print, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    HideCursor,
    MoveTo(u16, u16),
    SetStyle(Style),
    Print(String),
    ShowCursorAt(u16, u16),
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn set_style(&mut self, style: Style) {
        self.cmds.push(Command::SetStyle(style));
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Full repaint of `frame`.
    pub fn from_frame(frame: &Frame) -> Self {
        let mut w = Self::new();
        w.cmds.push(Command::HideCursor);
        let width = usize::from(frame.width);
        for (y, row) in frame.cells.chunks(width.max(1)).enumerate() {
            let Ok(y) = u16::try_from(y) else {
                break;
            };
            w.move_to(0, y);
            let mut current: Option<Style> = None;
            let mut run = String::new();
            for cell in row {
                let style = cell.style();
                if current != Some(style) {
                    w.print(std::mem::take(&mut run));
                    w.set_style(style);
                    current = Some(style);
                }
                run.push(cell.ch);
            }
            w.print(run);
        }
        if let Some((x, y)) = frame.cursor {
            w.cmds.push(Command::ShowCursorAt(x, y));
        }
        w
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::HideCursor => queue!(out, Hide)?,
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::SetStyle(style) => {
                    queue!(
                        out,
                        SetAttribute(Attribute::Reset),
                        SetForegroundColor(term_color(style.fg)),
                        SetBackgroundColor(term_color(style.bg))
                    )?;
                    if style.flags.contains(CellFlags::REVERSE) {
                        queue!(out, SetAttribute(Attribute::Reverse))?;
                    }
                    if style.flags.contains(CellFlags::BOLD) {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    }
                }
                Command::Print(s) => queue!(out, Print(s))?,
                Command::ShowCursorAt(x, y) => queue!(out, MoveTo(x, y), Show)?,
            }
        }
        queue!(out, SetAttribute(Attribute::Reset))?;
        out.flush()?;
        Ok(())
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::DarkGrey => TermColor::DarkGrey,
        Color::DarkYellow => TermColor::DarkYellow,
        Color::Red => TermColor::Red,
        Color::Green => TermColor::Green,
        Color::Cyan => TermColor::Cyan,
    }
}
