//! Invertible primitive edits and the linear undo/redo history.
//!
//! Every `Edit` carries enough data to build its own inverse. The history
//! keeps two stacks: `applied` holds the inverses of applied edits, `undone`
//! holds the original edits that were undone. Undo granularity is one
//! primitive edit.
//!
//! Laws (covered by tests):
//! * `undo(apply(e, S)) == S`
//! * `redo(undo(apply(e, S))) == apply(e, S)`
//!
//! A rejected edit (read-only document, stale position) leaves the document
//! and both stacks untouched.

use core_text::{Cursor, Document, DocumentError, toggled_case};
use thiserror::Error;
use tracing::trace;

/// Maximum number of edits retained on the applied stack.
pub const UNDO_HISTORY_MAX: usize = 10_000;

#[derive(Debug, Error)]
pub enum UndoError {
    #[error("Nothing left to undo or redo")]
    Boundary,
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl UndoError {
    /// Undo/redo on an empty stack is a boundary condition, not a failure.
    pub fn is_boundary(&self) -> bool {
        matches!(self, UndoError::Boundary)
    }
}

/// A primitive, invertible document mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    InsertChar { at: Cursor, ch: char },
    DeleteChar { at: Cursor, ch: char },
    SplitLine { at: Cursor },
    /// Join `line` with the next one; `column` is where the join happens.
    MergeLines { line: usize, column: usize },
    ReplaceChar { at: Cursor, old: char, new: char },
    ToggleCase { at: Cursor, from: char, to: char },
    InsertLine { line: usize, text: String },
    RemoveLine { line: usize, text: String },
    /// Swap two adjacent lines; the content of `from` ends up at `to`.
    MoveLine { from: usize, to: usize },
}

impl Edit {
    /// Delete the character under `at`, capturing it for the inverse.
    pub fn delete_char(doc: &Document, at: Cursor) -> Option<Edit> {
        doc.char_at(at).map(|ch| Edit::DeleteChar { at, ch })
    }

    /// Join `line` with its successor, if it has one.
    pub fn merge_lines(doc: &Document, line: usize) -> Option<Edit> {
        (line >= 1 && line < doc.line_count()).then(|| Edit::MergeLines {
            line,
            column: doc.line_len(line) + 1,
        })
    }

    pub fn replace_char(doc: &Document, at: Cursor, new: char) -> Option<Edit> {
        doc.char_at(at)
            .filter(|old| *old != new)
            .map(|old| Edit::ReplaceChar { at, old, new })
    }

    /// Toggle the case under `at`; `None` for caseless characters.
    pub fn toggle_case(doc: &Document, at: Cursor) -> Option<Edit> {
        let from = doc.char_at(at)?;
        toggled_case(from).map(|to| Edit::ToggleCase { at, from, to })
    }

    pub fn remove_line(doc: &Document, line: usize) -> Option<Edit> {
        if doc.line_count() < 2 {
            return None;
        }
        doc.line(line).map(|text| Edit::RemoveLine { line, text })
    }

    /// The edit that undoes `self`.
    pub fn inverse(&self) -> Edit {
        match self {
            Edit::InsertChar { at, ch } => Edit::DeleteChar { at: *at, ch: *ch },
            Edit::DeleteChar { at, ch } => Edit::InsertChar { at: *at, ch: *ch },
            Edit::SplitLine { at } => Edit::MergeLines {
                line: at.line,
                column: at.column,
            },
            Edit::MergeLines { line, column } => Edit::SplitLine {
                at: Cursor::new(*line, *column),
            },
            Edit::ReplaceChar { at, old, new } => Edit::ReplaceChar {
                at: *at,
                old: *new,
                new: *old,
            },
            Edit::ToggleCase { at, from, to } => Edit::ToggleCase {
                at: *at,
                from: *to,
                to: *from,
            },
            Edit::InsertLine { line, text } => Edit::RemoveLine {
                line: *line,
                text: text.clone(),
            },
            Edit::RemoveLine { line, text } => Edit::InsertLine {
                line: *line,
                text: text.clone(),
            },
            Edit::MoveLine { from, to } => Edit::MoveLine {
                from: *to,
                to: *from,
            },
        }
    }

    /// Where the cursor naturally rests after this edit is applied.
    pub fn landing(&self) -> Cursor {
        match self {
            Edit::InsertChar { at, .. } => Cursor::new(at.line, at.column + 1),
            Edit::DeleteChar { at, .. }
            | Edit::ReplaceChar { at, .. }
            | Edit::ToggleCase { at, .. } => *at,
            Edit::SplitLine { at } => Cursor::new(at.line + 1, 1),
            Edit::MergeLines { line, column } => Cursor::new(*line, *column),
            Edit::InsertLine { line, .. } | Edit::RemoveLine { line, .. } => {
                Cursor::new(*line, 1)
            }
            Edit::MoveLine { to, .. } => Cursor::new(*to, 1),
        }
    }

    /// Execute against `doc`, verifying the captured data still matches.
    pub fn apply_to(&self, doc: &mut Document) -> Result<(), DocumentError> {
        match self {
            Edit::InsertChar { at, ch } => doc.insert_char(*at, *ch),
            Edit::DeleteChar { at, ch } => {
                expect_char(doc, *at, *ch)?;
                doc.delete_char(*at).map(|_| ())
            }
            Edit::SplitLine { at } => doc.split_line(*at),
            Edit::MergeLines { line, column } => {
                if doc.line_len(*line) + 1 != *column {
                    return Err(DocumentError::OutOfBounds {
                        line: *line,
                        column: *column,
                    });
                }
                doc.merge_lines(*line).map(|_| ())
            }
            Edit::ReplaceChar { at, old, new } => {
                expect_char(doc, *at, *old)?;
                doc.replace_char(*at, *new).map(|_| ())
            }
            Edit::ToggleCase { at, from, to } => {
                expect_char(doc, *at, *from)?;
                if toggled_case(*from) == Some(*to) {
                    doc.toggle_case(*at).map(|_| ())
                } else {
                    doc.replace_char(*at, *to).map(|_| ())
                }
            }
            Edit::InsertLine { line, text } => doc.insert_line(*line, text),
            Edit::RemoveLine { line, text } => {
                if doc.line(*line).as_deref() != Some(text.as_str()) {
                    return Err(DocumentError::OutOfBounds {
                        line: *line,
                        column: 1,
                    });
                }
                doc.remove_line(*line).map(|_| ())
            }
            Edit::MoveLine { from, to } => doc.move_line(*from, *to),
        }
    }
}

fn expect_char(doc: &Document, at: Cursor, expected: char) -> Result<(), DocumentError> {
    if doc.is_read_only() {
        return Err(DocumentError::ReadOnly);
    }
    match doc.char_at(at) {
        Some(c) if c == expected => Ok(()),
        _ => Err(DocumentError::OutOfBounds {
            line: at.line,
            column: at.column,
        }),
    }
}

fn settle(doc: &Document, edit: &Edit) -> Cursor {
    let mut cur = edit.landing();
    cur.clamp_to(doc);
    cur
}

/// Linear two-stack history owned by one buffer slot.
#[derive(Debug, Default, Clone)]
pub struct UndoHistory {
    applied: Vec<Edit>,
    undone: Vec<Edit>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.applied.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.undone.len()
    }

    /// Apply a fresh edit. Clears the redo stack and returns the cursor the
    /// edit implies.
    pub fn apply(&mut self, doc: &mut Document, edit: Edit) -> Result<Cursor, UndoError> {
        edit.apply_to(doc)?;
        let cursor = settle(doc, &edit);
        trace!(target: "state.undo", ?edit, undo_depth = self.applied.len() + 1, "apply");
        self.applied.push(edit.inverse());
        if self.applied.len() > UNDO_HISTORY_MAX {
            self.applied.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
        if !self.undone.is_empty() {
            self.undone.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
        Ok(cursor)
    }

    /// Revert the most recent edit.
    pub fn undo(&mut self, doc: &mut Document) -> Result<Cursor, UndoError> {
        let inverse = self.applied.pop().ok_or(UndoError::Boundary)?;
        if let Err(e) = inverse.apply_to(doc) {
            self.applied.push(inverse);
            return Err(e.into());
        }
        let cursor = settle(doc, &inverse);
        self.undone.push(inverse.inverse());
        trace!(target: "state.undo", undo_depth = self.applied.len(), redo_depth = self.undone.len(), "undo_pop");
        Ok(cursor)
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self, doc: &mut Document) -> Result<Cursor, UndoError> {
        let edit = self.undone.pop().ok_or(UndoError::Boundary)?;
        if let Err(e) = edit.apply_to(doc) {
            self.undone.push(edit);
            return Err(e.into());
        }
        let cursor = settle(doc, &edit);
        self.applied.push(edit.inverse());
        trace!(target: "state.undo", undo_depth = self.applied.len(), redo_depth = self.undone.len(), "redo_pop");
        Ok(cursor)
    }
}
