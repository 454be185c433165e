//! Cursor motion helpers.
//!
//! These operate purely on a `Document` + `Cursor` pair and are free of
//! editor state. Horizontal motions never leave the current line except the
//! two word motions, which wrap and stop quietly at the document edges.
//! Vertical motions take the sticky column explicitly; the caller owns it.

use crate::{Cursor, Document, is_blank};

fn chars_of(doc: &Document, line: usize) -> Vec<char> {
    doc.line(line)
        .map(|l| l.chars().collect())
        .unwrap_or_default()
}

/// Move left one character; no wrap.
pub fn left(_doc: &Document, cur: &mut Cursor) {
    if cur.column > 1 {
        cur.column -= 1;
    }
}

/// Move right one character, at most to the column after the last character.
pub fn right(doc: &Document, cur: &mut Cursor) {
    if cur.column <= doc.line_len(cur.line) {
        cur.column += 1;
    }
}

pub fn line_start(_doc: &Document, cur: &mut Cursor) {
    cur.column = 1;
}

/// Rest on the last character of the line (column 1 on an empty line).
pub fn line_end(doc: &Document, cur: &mut Cursor) {
    cur.column = doc.line_len(cur.line).max(1);
}

/// First non-blank character; last character when the line is all blanks.
pub fn first_non_blank(doc: &Document, cur: &mut Cursor) {
    cur.column = first_non_blank_column(doc, cur.line);
}

fn first_non_blank_column(doc: &Document, line: usize) -> usize {
    let chars = chars_of(doc, line);
    match chars.iter().position(|c| !is_blank(*c)) {
        Some(idx) => idx + 1,
        None => chars.len().max(1),
    }
}

/// Move up one line, clamping the column to `min(desired, line_len + 1)`.
pub fn up(doc: &Document, cur: &mut Cursor, desired: usize) {
    if cur.line > 1 {
        cur.line -= 1;
        cur.column = desired.clamp(1, doc.line_len(cur.line) + 1);
    }
}

/// Move down one line, clamping the column to `min(desired, line_len + 1)`.
pub fn down(doc: &Document, cur: &mut Cursor, desired: usize) {
    if cur.line < doc.line_count() {
        cur.line += 1;
        cur.column = desired.clamp(1, doc.line_len(cur.line) + 1);
    }
}

/// Skip the current run of non-blanks, then the following blanks.
///
/// Reaching the end of the line wraps to the first non-blank of the next
/// line; on the last line the cursor settles on the final character.
pub fn next_word(doc: &Document, cur: &mut Cursor) {
    let chars = chars_of(doc, cur.line);
    let len = chars.len();
    let mut pos = cur.column - 1;
    if pos < len {
        while pos < len && !is_blank(chars[pos]) {
            pos += 1;
        }
        while pos < len && is_blank(chars[pos]) {
            pos += 1;
        }
        if pos < len {
            cur.column = pos + 1;
            return;
        }
    }
    if cur.line < doc.line_count() {
        cur.line += 1;
        cur.column = first_non_blank_column(doc, cur.line);
    } else if cur.column < len {
        cur.column = len;
    }
}

/// Walk back over the current run of non-blanks, then over blanks.
///
/// At column 1 the motion wraps to the last character of the previous
/// line; at the document start it stays put.
pub fn previous_word(doc: &Document, cur: &mut Cursor) {
    let chars = chars_of(doc, cur.line);
    if cur.column <= 1 || chars.is_empty() {
        if cur.line > 1 {
            cur.line -= 1;
            cur.column = doc.line_len(cur.line).max(1);
        } else {
            cur.column = 1;
        }
        return;
    }
    let mut pos = (cur.column - 1).min(chars.len() - 1);
    while pos > 0 && !is_blank(chars[pos]) {
        pos -= 1;
    }
    while pos > 0 && is_blank(chars[pos]) {
        pos -= 1;
    }
    cur.column = pos + 1;
}

fn is_empty_line(doc: &Document, line: usize) -> bool {
    doc.line(line).is_none_or(|l| l.trim().is_empty())
}

/// Next blank line below the cursor, else the end of the document.
pub fn next_paragraph(doc: &Document, cur: &mut Cursor) {
    let count = doc.line_count();
    let target = (cur.line + 1..=count).find(|l| is_empty_line(doc, *l));
    match target {
        Some(line) => *cur = Cursor::new(line, 1),
        None => {
            cur.line = count;
            line_end(doc, cur);
        }
    }
}

/// Previous blank line above the cursor, else the start of the document.
pub fn previous_paragraph(doc: &Document, cur: &mut Cursor) {
    let target = (1..cur.line).rev().find(|l| is_empty_line(doc, *l));
    *cur = Cursor::new(target.unwrap_or(1), 1);
}

/// Next occurrence of `ch` to the right on the same line; no move if absent.
pub fn find_char_forward(doc: &Document, cur: &mut Cursor, ch: char) {
    let chars = chars_of(doc, cur.line);
    if let Some(offset) = chars.iter().skip(cur.column).position(|c| *c == ch) {
        cur.column += offset + 1;
    }
}

/// Previous occurrence of `ch` to the left on the same line; no move if absent.
pub fn find_char_backward(doc: &Document, cur: &mut Cursor, ch: char) {
    let chars = chars_of(doc, cur.line);
    let upto = (cur.column - 1).min(chars.len());
    if let Some(idx) = chars[..upto].iter().rposition(|c| *c == ch) {
        cur.column = idx + 1;
    }
}

pub fn document_start(_doc: &Document, cur: &mut Cursor) {
    *cur = Cursor::origin();
}

/// First non-blank of the last line.
pub fn document_end(doc: &Document, cur: &mut Cursor) {
    cur.line = doc.line_count();
    first_non_blank(doc, cur);
}
