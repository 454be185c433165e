mod common;

use common::{Harness, numbered_lines};
use core_model::LEADING_MARKER;
use core_state::{Mode, Severity};
use core_text::Cursor;
use pretty_assertions::assert_eq;

#[test]
fn typing_into_new_buffer() {
    let mut h = Harness::empty();
    h.keys("ihello");
    assert_eq!(h.lines(), vec!["hello"]);
    assert_eq!(h.cursor(), Cursor::new(1, 6));
    assert_eq!(h.session.mode, Mode::Insertion);
}

#[test]
fn previous_word_walks_back_to_line_start() {
    let mut h = Harness::new("This is some text\nsecond line");
    h.keys("$");
    let mut visited = vec![h.cursor().column];
    for _ in 0..4 {
        h.keys("b");
        visited.push(h.cursor().column);
    }
    assert_eq!(visited, vec![17, 12, 7, 4, 1]);
    h.keys("b");
    assert_eq!(h.cursor(), Cursor::new(1, 1));
}

#[test]
fn quit_refuses_modified_buffer_until_forced() {
    let mut h = Harness::new("abc");
    h.keys("x");
    assert!(h.session.active().document.is_dirty());

    let result = h.command("q");
    assert!(!result.quit);
    let message = h.session.message.clone().unwrap();
    assert_eq!(message.text, "Unsaved changes. Use `;q!` to discard");
    assert_eq!(message.severity, Severity::Alert);

    assert!(h.command("q!").quit);
}

#[test]
fn goto_line_recenters_only_when_off_screen() {
    let mut h = Harness::new(&numbered_lines(88));
    assert_eq!(h.session.active().viewport.height, 22);

    h.command("77");
    let slot = h.session.active();
    assert_eq!(slot.cursor, Cursor::new(77, 1));
    assert_eq!(slot.viewport.top_line, 65);
    assert!(slot.viewport.is_visible(77));
    let status = h.status_line();
    assert!(status.ends_with("| 77:1 "), "{status:?}");
    assert_eq!(h.frame().row_text(0), format!("{:<80}", " 65│line 65"));

    let mut h = Harness::new(&numbered_lines(88));
    h.command("11");
    assert_eq!(h.cursor(), Cursor::new(11, 1));
    assert_eq!(h.session.active().viewport.top_line, 1);
    assert!(h.status_line().ends_with("| 11:1 "));
}

#[test]
fn horizontal_scroll_keeps_screen_column() {
    let line = "a".repeat(200);
    let mut h = Harness::new(&line);
    let text_width = h.session.active().text_width(true);
    assert_eq!(text_width, 77);

    for _ in 1..text_width {
        h.keys("l");
    }
    let slot = h.session.active();
    assert_eq!(slot.cursor.column, text_width);
    assert_eq!(slot.viewport.horizontal_offset, 0);
    let screen = slot.viewport.screen_column(slot.cursor.column);

    for step in 1..=5 {
        h.keys("l");
        let slot = h.session.active();
        assert_eq!(slot.cursor.column, text_width + step);
        assert_eq!(slot.viewport.screen_column(slot.cursor.column), screen);
        let status = h.status_line();
        assert!(
            status.ends_with(&format!("| 1:{} ", text_width + step)),
            "{status:?}"
        );
        assert_eq!(h.frame().cursor, Some((79, 0)));
    }
    let slot = h.session.active();
    let cells = slot.viewport.project(&line, text_width);
    assert_eq!(cells[0], LEADING_MARKER);
}

#[test]
fn unknown_command_changes_nothing() {
    let mut h = Harness::new("one\ntwo");
    h.keys("j");
    let before = h.session.active().document.lines();
    h.command("frobnicate");
    let message = h.session.message.clone().unwrap();
    assert_eq!(message.text, "Unknown command");
    assert_eq!(message.severity, Severity::Alert);
    assert_eq!(h.lines(), before);
    assert_eq!(h.cursor(), Cursor::new(2, 1));
    assert_eq!(h.session.mode, Mode::Navigation);
    assert!(!h.session.active().document.is_dirty());
}

#[test]
fn message_lives_until_next_key() {
    let mut h = Harness::new("one");
    h.command("nope");
    assert_eq!(h.message(), Some("Unknown command"));
    let result = h.keys("l");
    assert!(result.dirty);
    assert_eq!(h.message(), None);
}

#[test]
fn editing_round_trip_through_undo() {
    let mut h = Harness::new("alpha\nbeta");
    h.keys("A!<Esc>jdd");
    assert_eq!(h.lines(), vec!["alpha!"]);
    h.keys("uu");
    assert_eq!(h.lines(), vec!["alpha", "beta"]);
    h.keys("<C-r>U");
    assert_eq!(h.lines(), vec!["alpha!"]);
}

#[test]
fn pending_keys_complete_or_cancel() {
    let mut h = Harness::new("hello world");
    h.keys("fo");
    assert_eq!(h.cursor().column, 5);
    h.keys("rO");
    assert_eq!(h.lines(), vec!["hellO world"]);
    h.keys("d<Esc>x");
    assert_eq!(h.lines(), vec!["hell world"]);
    h.keys("Fh");
    assert_eq!(h.cursor().column, 1);
}
