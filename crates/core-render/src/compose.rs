//! Frame composition: `render(session, ctx)`.
//!
//! Rows top to bottom: optional tab bar, buffer rows (gutter + text, `~`
//! past the end of the document), status bar, message line. An active
//! overlay is drawn over the buffer rows. The hardware cursor goes to the
//! command line edit position in CommandLine mode, else to the buffer
//! cursor when it is on screen.

use crate::overlay::OverlayPanel;
use crate::status::{StatusContext, compose_status, format_status};
use crate::{CellFlags, Frame, Style};
use core_model::{LayoutRegion, Session, Slot, gutter_label};
use core_state::Mode;
use tracing::trace;

/// Inputs that do not live in the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub branch: Option<&'a str>,
}

pub fn render(session: &Session, ctx: &RenderContext<'_>) -> Frame {
    let (width, height) = session.size();
    let mut frame = Frame::new(width, height);
    let layout = session.layout();

    if let Some(row) = layout.tab_bar {
        draw_tab_bar(&mut frame, session, row);
    }
    let buffer_cursor = draw_buffer(
        &mut frame,
        session.active(),
        layout.content,
        session.options.line_numbers,
    );
    if let Some(panel) = OverlayPanel::from_session(session) {
        panel.draw(&mut frame, layout.content);
    }
    if height >= 2 {
        draw_status(&mut frame, session, ctx, layout.status_row);
    }
    let command_cursor = draw_message(&mut frame, session, layout.message_row);

    match (command_cursor, buffer_cursor) {
        (Some((x, y)), _) | (None, Some((x, y))) => frame.set_cursor(x, y),
        (None, None) => {}
    }
    trace!(target: "render", width, height, cursor = ?frame.cursor, "frame_composed");
    frame
}

/// `| name | name |` with the active name reversed.
fn draw_tab_bar(frame: &mut Frame, session: &Session, row: u16) {
    let mut x = frame.put_str(0, row, "| ", Style::default());
    for entry in session.buffer_entries() {
        let style = if entry.active {
            Style::reversed()
        } else {
            Style::default()
        };
        x = frame.put_str(x, row, &entry.label(), style);
        x = frame.put_str(x, row, " | ", Style::default());
    }
}

/// Draw the active slot into `region`; returns the screen cursor when the
/// document cursor is visible.
fn draw_buffer(
    frame: &mut Frame,
    slot: &Slot,
    region: LayoutRegion,
    line_numbers: bool,
) -> Option<(u16, u16)> {
    let doc = &slot.document;
    let view = &slot.viewport;
    let line_count = doc.line_count();
    let gutter = slot.gutter_width(line_numbers);
    let text_width = usize::from(region.width).saturating_sub(gutter);

    for r in 0..region.height {
        let y = region.y + r;
        let line = view.top_line + usize::from(r);
        if line > line_count {
            frame.set(region.x, y, '~', Style::filler());
            continue;
        }
        let mut x = region.x;
        if gutter > 0 {
            let style = if line == slot.cursor.line {
                Style::gutter_active()
            } else {
                Style::gutter()
            };
            x = frame.put_str(x, y, &gutter_label(line, line_count), style);
        }
        let text = doc.line(line).unwrap_or_default();
        let len = text.chars().count();
        let cells = view.project(&text, text_width);
        let last = cells.len().saturating_sub(1);
        for (i, ch) in cells.iter().enumerate() {
            let leading = i == 0 && view.horizontal_offset > 0 && len > 0;
            let trailing = i == last && len > view.horizontal_offset + text_width;
            let style = if leading || trailing {
                Style::marker()
            } else {
                Style::default()
            };
            frame.set(x + i as u16, y, *ch, style);
        }
    }

    let cursor = slot.cursor;
    if !view.is_visible(cursor.line) || text_width == 0 {
        return None;
    }
    let column = view.screen_column(cursor.column);
    let row = view.screen_row(cursor.line);
    if column >= text_width || row >= usize::from(region.height) {
        return None;
    }
    Some((
        region.x + (gutter + column) as u16,
        region.y + row as u16,
    ))
}

fn draw_status(frame: &mut Frame, session: &Session, ctx: &RenderContext<'_>, row: u16) {
    let slot = session.active();
    let name = slot.document.display_name();
    let status = StatusContext {
        mode: &session.mode,
        read_only: slot.document.is_read_only(),
        modified: slot.document.is_dirty(),
        open_buffers: session.len(),
        file_name: &name,
        branch: ctx.branch,
        line: slot.cursor.line,
        column: slot.cursor.column,
    };
    let bar = format_status(&compose_status(&status), usize::from(frame.width));
    frame.put_str(0, row, &bar, Style::status_bar());
}

/// Command line or status message; returns the command line cursor.
fn draw_message(frame: &mut Frame, session: &Session, row: u16) -> Option<(u16, u16)> {
    if let Mode::CommandLine(cl) = &session.mode {
        frame.put_str(0, row, ";", Style::default());
        frame.put_str(1, row, cl.text(), Style::default());
        let x = u16::try_from(cl.edit_position()).unwrap_or(u16::MAX);
        return (x < frame.width).then_some((x, row));
    }
    if let Some(message) = &session.message {
        let style = Style::message(message.severity).with_flags(CellFlags::BOLD);
        frame.put_str(0, row, &message.text, style);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use core_model::SessionOptions;
    use core_state::{CommandLine, StatusMessage};
    use core_text::{Cursor, Document};
    use pretty_assertions::assert_eq;

    fn ctx() -> RenderContext<'static> {
        RenderContext { branch: None }
    }

    fn session(text: &str, width: u16, height: u16) -> Session {
        let mut s = Session::new(vec![Document::from_text(text)], SessionOptions::default());
        s.resize(width, height);
        s
    }

    #[test]
    fn gutter_text_and_filler_rows() {
        let s = session("ab\ncd", 12, 6);
        let f = render(&s, &ctx());
        assert_eq!(f.row_text(0), " 1│ab       ");
        assert_eq!(f.row_text(1), " 2│cd       ");
        assert_eq!(f.row_text(2), "~           ");
        assert_eq!(f.row_text(3), "~           ");
        assert_eq!(f.cell(1, 0).unwrap().fg, Color::DarkYellow);
        assert_eq!(f.cell(1, 1).unwrap().fg, Color::DarkGrey);
        assert_eq!(f.cursor, Some((3, 0)));
    }

    #[test]
    fn gutter_disabled() {
        let mut s = session("ab", 8, 4);
        s.options.line_numbers = false;
        let f = render(&s, &ctx());
        assert_eq!(f.row_text(0), "ab      ");
        assert_eq!(f.cursor, Some((0, 0)));
    }

    #[test]
    fn status_and_message_rows() {
        let mut s = session("x", 40, 5);
        s.set_message(StatusMessage::alert("Unknown command"));
        let f = render(&s, &ctx());
        assert!(f.row_text(3).starts_with(" NAVIGATION |"));
        assert!(f.cell(0, 3).unwrap().flags.contains(CellFlags::REVERSE));
        assert!(f.row_text(4).starts_with("Unknown command"));
        assert_eq!(f.cell(0, 4).unwrap().fg, Color::Red);
    }

    #[test]
    fn command_line_owns_cursor() {
        let mut s = session("x", 20, 5);
        let mut cl = CommandLine::new(Cursor::origin());
        cl.insert('w');
        cl.insert('q');
        s.mode = Mode::CommandLine(cl);
        let f = render(&s, &ctx());
        assert!(f.row_text(4).starts_with(";wq"));
        assert_eq!(f.cursor, Some((3, 4)));
        assert!(f.row_text(3).starts_with(" COMMAND |"));
    }

    #[test]
    fn tab_bar_with_several_buffers() {
        let mut s = Session::new(
            vec![
                Document::from_text("a").with_path("one.rs"),
                Document::from_text("b").with_path("two.rs"),
            ],
            SessionOptions::default(),
        );
        s.resize(30, 6);
        let f = render(&s, &ctx());
        assert_eq!(f.row_text(0), format!("{:<30}", "| one.rs | two.rs |"));
        assert!(f.cell(2, 0).unwrap().flags.contains(CellFlags::REVERSE));
        assert!(!f.cell(11, 0).unwrap().flags.contains(CellFlags::REVERSE));
        assert_eq!(f.row_text(1), format!("{:<30}", " 1│a"));
        assert!(f.row_text(4).contains("[2]"));
    }

    #[test]
    fn continuation_markers_on_long_lines() {
        let line: String = ('a'..='z').collect();
        let mut s = session(&line, 10, 4);
        let f = render(&s, &ctx());
        // gutter " 1│" leaves 7 text columns.
        assert_eq!(f.row_text(0), " 1│abcdef»");
        assert_eq!(f.cell(9, 0).unwrap().fg, Color::Cyan);

        s.active_mut().set_cursor(Cursor::new(1, 10));
        s.scroll_to_cursor();
        let f = render(&s, &ctx());
        assert_eq!(f.row_text(0), " 1│«efghi»");
        assert_eq!(f.cursor, Some((9, 0)));
    }

    #[test]
    fn gutterless_scroll_keeps_cursor_on_its_character() {
        let line: String = ('a'..='z').collect();
        let mut s = session(&line, 10, 4);
        s.options.line_numbers = false;
        s.active_mut().set_cursor(Cursor::new(1, 15));
        s.scroll_to_cursor();
        assert_eq!(s.active().viewport.horizontal_offset, 5);
        let f = render(&s, &ctx());
        assert_eq!(f.row_text(0), "«ghijklmn»");
        assert_eq!(f.cursor, Some((9, 0)));
    }

    #[test]
    fn tab_indented_lines_render_as_spaces() {
        let s = session("\tif x {\n\t\treturn;", 30, 5);
        let f = render(&s, &ctx());
        assert_eq!(f.row_text(0), format!("{:<30}", " 1│    if x {"));
        assert_eq!(f.row_text(1), format!("{:<30}", " 2│        return;"));
        assert!(!f.row_text(1).contains(crate::REPLACEMENT_GLYPH));
    }

    #[test]
    fn overlay_is_drawn_over_buffer_rows() {
        let mut s = session("x", 30, 10);
        s.overlay = Some(core_state::Overlay::BufferList { selected: 0 });
        let f = render(&s, &ctx());
        let all: String = (0..8).map(|y| f.row_text(y)).collect();
        assert!(all.contains(" Buffers "));
        assert!(all.contains("NO NAME"));
    }
}
