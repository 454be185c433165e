use core_text::{Document, DocumentError};
use std::fs;

#[test]
fn save_then_reopen_yields_identical_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("round.txt");
    let mut doc = Document::from_text("first line\n\n  indented\tTab\nlast").with_path(&path);
    let bytes = doc.save(None).unwrap();
    assert_eq!(bytes, fs::read(&path).unwrap().len());
    let reopened = Document::open(&path).unwrap();
    assert_eq!(reopened.lines(), doc.lines());
    assert!(!reopened.is_dirty());
}

#[test]
fn every_line_is_newline_terminated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nl.txt");
    let mut doc = Document::from_text("a\nb").with_path(&path);
    assert_eq!(doc.save(None).unwrap(), 4);
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
}

#[test]
fn trailing_newline_is_not_an_extra_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.txt");
    fs::write(&path, "x\ny\n").unwrap();
    let doc = Document::open(&path).unwrap();
    assert_eq!(doc.lines(), vec!["x", "y"]);
}

#[test]
fn crlf_files_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crlf.txt");
    fs::write(&path, "one\r\ntwo\r\n").unwrap();
    let doc = Document::open(&path).unwrap();
    assert_eq!(doc.lines(), vec!["one", "two"]);
}

#[test]
fn missing_path_yields_empty_named_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.txt");
    let doc = Document::open(&path).unwrap();
    assert_eq!(doc.line_count(), 1);
    assert_eq!(doc.path(), Some(path.as_path()));
    assert!(!doc.is_dirty());
    assert!(!path.exists(), "opening must not create the file");
}

#[test]
fn unreadable_content_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.bin");
    fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
    let err = Document::open(&path).unwrap_err();
    assert!(matches!(err, DocumentError::Io { .. }));
    assert!(err.to_string().starts_with("Error: "));
}

#[test]
fn save_without_any_path_fails() {
    let mut doc = Document::from_text("x");
    assert!(matches!(doc.save(None), Err(DocumentError::NoFileName)));
}

#[test]
fn save_to_explicit_path_adopts_it_and_clears_dirty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adopted.txt");
    let mut doc = Document::new();
    doc.insert_char(core_text::Cursor::origin(), 'z').unwrap();
    assert!(doc.is_dirty());
    doc.save(Some(&path)).unwrap();
    assert_eq!(doc.path(), Some(path.as_path()));
    assert!(!doc.is_dirty());
}

#[test]
fn write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("f.txt");
    let mut doc = Document::from_text("x");
    assert!(matches!(doc.save(Some(&path)), Err(DocumentError::Io { .. })));
}

#[test]
fn tabs_expand_to_configured_width_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tabs.txt");
    fs::write(&path, "\tone\n\t\ttwo\n").unwrap();
    let doc = Document::open_with(&path, 2).unwrap();
    assert_eq!(doc.lines(), vec!["  one", "    two"]);
    assert_eq!(doc.line_len(2), 7);
    assert!(!doc.is_dirty());
}
