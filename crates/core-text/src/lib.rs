//! Rope-backed document abstraction.
//!
//! A `Document` is the line model for one open file: a `ropey::Rope` whose
//! lines are joined by `\n` with no trailing newline stored, plus the file
//! identity (`path`, `read_only`) and the `dirty` flag. Positions are
//! expressed as 1-indexed `Cursor { line, column }` pairs counting
//! characters, never bytes.
//!
//! Invariants:
//! * `line_count() >= 1`; an empty document has exactly one empty line.
//! * Every mutation validates its position first and fails with
//!   `DocumentError::OutOfBounds` without touching the rope.
//! * A read-only document rejects every mutation with `DocumentError::ReadOnly`.
//!
//! Line endings are normalized to LF on open and written back as LF, one
//! newline-terminated line per stored line. Tabs are expanded to spaces as
//! text enters a document (`open_with`, `from_text`), so one character
//! always occupies one screen cell.

use ropey::Rope;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub mod motion;

/// Name shown for documents without an associated path.
pub const NO_NAME: &str = "NO NAME";

/// Spaces substituted for a tab when no width is configured.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Errors raised by document I/O and mutation.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Buffer is read-only")]
    ReadOnly,
    #[error("No file name")]
    NoFileName,
    #[error("Position {line}:{column} is outside the document")]
    OutOfBounds { line: usize, column: usize },
    #[error("Line breaks cannot be inserted as characters")]
    LineBreak,
    #[error("Cannot remove the only line")]
    LastLine,
    #[error("Error: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A 1-indexed position inside a document.
///
/// `column` may equal `line_len + 1`, meaning "after the last character".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn origin() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Clamp into `[1, line_count] x [1, line_len + 1]` for `doc`.
    pub fn clamp_to(&mut self, doc: &Document) {
        self.line = self.line.clamp(1, doc.line_count());
        self.column = self.column.clamp(1, doc.line_len(self.line) + 1);
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::origin()
    }
}

/// Line storage plus file identity for one open file.
#[derive(Debug, Clone)]
pub struct Document {
    rope: Rope,
    path: Option<PathBuf>,
    dirty: bool,
    read_only: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty, unnamed document with a single empty line.
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
            dirty: false,
            read_only: false,
        }
    }

    /// Build a document from `\n`-joined text. Every `\n` starts a new line,
    /// so `"a\n"` holds two lines (`"a"` and `""`). Tabs become
    /// `DEFAULT_TAB_WIDTH` spaces.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&expand_tabs(text, DEFAULT_TAB_WIDTH)),
            ..Self::new()
        }
    }

    /// Attach a path without touching the file system.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Load `path` with `DEFAULT_TAB_WIDTH` tab expansion.
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        Self::open_with(path, DEFAULT_TAB_WIDTH)
    }

    /// Load `path` into a new document, replacing every tab with
    /// `tab_width` spaces.
    ///
    /// A missing file yields an empty document associated with `path`. A file
    /// that exists but cannot be read (permissions, invalid UTF-8) is an
    /// `Io` error.
    pub fn open_with(path: &Path, tab_width: usize) -> Result<Self, DocumentError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(target: "io", file = %path.display(), "file_missing_new_buffer");
                return Ok(Self::new().with_path(path));
            }
            Err(source) => {
                return Err(DocumentError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let norm = normalize_line_endings(&content);
        if norm.mixed {
            warn!(target: "io", file = %path.display(), "mixed_line_endings_detected");
        }
        let tabs = norm.normalized.matches('\t').count();
        if tabs > 0 {
            debug!(target: "io", file = %path.display(), tabs, tab_width, "tabs_expanded");
        }
        let mut text = expand_tabs(&norm.normalized, tab_width).into_owned();
        if text.ends_with('\n') {
            text.pop();
        }
        let read_only = !is_writable(path);
        let doc = Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
            dirty: false,
            read_only,
        };
        debug!(
            target: "io",
            file = %path.display(),
            size_bytes = content.len(),
            line_count = doc.line_count(),
            read_only,
            "file_read_ok"
        );
        Ok(doc)
    }

    /// Write every line followed by `\n` to `target` or the document path.
    ///
    /// Returns the number of bytes written. An explicit target is adopted as
    /// the document path when the document had none.
    pub fn save(&mut self, target: Option<&Path>) -> Result<usize, DocumentError> {
        let path = match (target, self.path.as_ref()) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(p)) => p.clone(),
            (None, None) => return Err(DocumentError::NoFileName),
        };
        let mut content = String::with_capacity(self.rope.len_bytes() + 1);
        for line in 1..=self.line_count() {
            let slice = self.rope.line(line - 1);
            for chunk in slice.chunks() {
                content.push_str(chunk);
            }
            if line == self.line_count() {
                content.push('\n');
            }
        }
        fs::write(&path, content.as_bytes()).map_err(|source| DocumentError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(target: "io", file = %path.display(), bytes = content.len(), "file_write_ok");
        if self.path.is_none() {
            self.path = Some(path);
        }
        self.dirty = false;
        Ok(content.len())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// File name component of the path, or `NO NAME`.
    pub fn short_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| NO_NAME.to_string())
    }

    /// Full path as displayed in the status bar, or `NO NAME`.
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| NO_NAME.to_string())
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of 1-indexed `line` without its newline.
    pub fn line(&self, line: usize) -> Option<String> {
        if line == 0 || line > self.line_count() {
            return None;
        }
        let mut s = self.rope.line(line - 1).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }

    /// Characters on 1-indexed `line` (0 when out of range).
    pub fn line_len(&self, line: usize) -> usize {
        if line == 0 || line > self.line_count() {
            return 0;
        }
        let slice = self.rope.line(line - 1);
        let len = slice.len_chars();
        if line < self.line_count() { len - 1 } else { len }
    }

    /// All lines, mostly useful to tests and save round trips.
    pub fn lines(&self) -> Vec<String> {
        (1..=self.line_count())
            .filter_map(|l| self.line(l))
            .collect()
    }

    /// Character under `at`, if `at` names one.
    pub fn char_at(&self, at: Cursor) -> Option<char> {
        if at.line == 0 || at.column == 0 || at.column > self.line_len(at.line) {
            return None;
        }
        let idx = self.rope.line_to_char(at.line - 1) + at.column - 1;
        Some(self.rope.char(idx))
    }

    /// Literal, non-overlapping matches of `pattern` as match start cursors.
    pub fn find_all(&self, pattern: &str) -> Vec<Cursor> {
        if pattern.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        for line in 1..=self.line_count() {
            let Some(text) = self.line(line) else {
                continue;
            };
            for (byte, _) in text.match_indices(pattern) {
                out.push(Cursor::new(line, text[..byte].chars().count() + 1));
            }
        }
        out
    }

    fn writable(&self) -> Result<(), DocumentError> {
        if self.read_only {
            Err(DocumentError::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Rope char index for `at`, allowing `column == line_len + 1`.
    fn char_index(&self, at: Cursor) -> Result<usize, DocumentError> {
        if at.line == 0
            || at.line > self.line_count()
            || at.column == 0
            || at.column > self.line_len(at.line) + 1
        {
            return Err(DocumentError::OutOfBounds {
                line: at.line,
                column: at.column,
            });
        }
        Ok(self.rope.line_to_char(at.line - 1) + at.column - 1)
    }

    /// Rope char index for an existing character at `at`.
    fn existing_char_index(&self, at: Cursor) -> Result<usize, DocumentError> {
        if at.column > self.line_len(at.line) {
            return Err(DocumentError::OutOfBounds {
                line: at.line,
                column: at.column,
            });
        }
        self.char_index(at)
    }

    pub fn insert_char(&mut self, at: Cursor, ch: char) -> Result<(), DocumentError> {
        self.writable()?;
        if ch == '\n' || ch == '\r' {
            return Err(DocumentError::LineBreak);
        }
        let idx = self.char_index(at)?;
        self.rope.insert_char(idx, ch);
        self.dirty = true;
        Ok(())
    }

    /// Remove and return the character under `at`.
    pub fn delete_char(&mut self, at: Cursor) -> Result<char, DocumentError> {
        self.writable()?;
        let idx = self.existing_char_index(at)?;
        let ch = self.rope.char(idx);
        self.rope.remove(idx..idx + 1);
        self.dirty = true;
        Ok(ch)
    }

    /// Break the line at `at`; text from `at.column` onward moves to a new line.
    pub fn split_line(&mut self, at: Cursor) -> Result<(), DocumentError> {
        self.writable()?;
        let idx = self.char_index(at)?;
        self.rope.insert_char(idx, '\n');
        self.dirty = true;
        Ok(())
    }

    /// Join `line` with the line below it. Returns the join column (the
    /// former `line_len(line) + 1`).
    pub fn merge_lines(&mut self, line: usize) -> Result<usize, DocumentError> {
        self.writable()?;
        if line == 0 || line >= self.line_count() {
            return Err(DocumentError::OutOfBounds { line, column: 1 });
        }
        let column = self.line_len(line) + 1;
        let newline = self.rope.line_to_char(line) - 1;
        self.rope.remove(newline..newline + 1);
        self.dirty = true;
        Ok(column)
    }

    /// Overwrite the character under `at`, returning the previous one.
    pub fn replace_char(&mut self, at: Cursor, ch: char) -> Result<char, DocumentError> {
        self.writable()?;
        if ch == '\n' || ch == '\r' {
            return Err(DocumentError::LineBreak);
        }
        let idx = self.existing_char_index(at)?;
        let old = self.rope.char(idx);
        self.rope.remove(idx..idx + 1);
        self.rope.insert_char(idx, ch);
        self.dirty = true;
        Ok(old)
    }

    /// Flip the case of the character under `at`. Returns `(from, to)`;
    /// caseless characters come back unchanged and leave the document clean.
    pub fn toggle_case(&mut self, at: Cursor) -> Result<(char, char), DocumentError> {
        self.writable()?;
        let idx = self.existing_char_index(at)?;
        let from = self.rope.char(idx);
        let Some(to) = toggled_case(from) else {
            return Ok((from, from));
        };
        self.rope.remove(idx..idx + 1);
        self.rope.insert_char(idx, to);
        self.dirty = true;
        Ok((from, to))
    }

    /// Insert `text` as a whole new line so that it becomes line `line`.
    /// `line` may be `line_count() + 1` to append.
    pub fn insert_line(&mut self, line: usize, text: &str) -> Result<(), DocumentError> {
        self.writable()?;
        if text.contains(['\n', '\r']) {
            return Err(DocumentError::LineBreak);
        }
        let count = self.line_count();
        if line == 0 || line > count + 1 {
            return Err(DocumentError::OutOfBounds { line, column: 1 });
        }
        if line <= count {
            let idx = self.rope.line_to_char(line - 1);
            self.rope.insert(idx, &format!("{text}\n"));
        } else {
            let idx = self.rope.len_chars();
            self.rope.insert(idx, &format!("\n{text}"));
        }
        self.dirty = true;
        Ok(())
    }

    /// Remove line `line` entirely and return its content.
    pub fn remove_line(&mut self, line: usize) -> Result<String, DocumentError> {
        self.writable()?;
        let count = self.line_count();
        if line == 0 || line > count {
            return Err(DocumentError::OutOfBounds { line, column: 1 });
        }
        if count == 1 {
            return Err(DocumentError::LastLine);
        }
        let text = self.line(line).unwrap_or_default();
        let (start, end) = if line < count {
            (
                self.rope.line_to_char(line - 1),
                self.rope.line_to_char(line),
            )
        } else {
            // Last line: take the newline that precedes it.
            (
                self.rope.line_to_char(line - 1) - 1,
                self.rope.len_chars(),
            )
        };
        self.rope.remove(start..end);
        self.dirty = true;
        Ok(text)
    }

    /// Swap line `from` with the adjacent line `to`.
    pub fn move_line(&mut self, from: usize, to: usize) -> Result<(), DocumentError> {
        self.writable()?;
        let count = self.line_count();
        if from == 0 || to == 0 || from > count || to > count || from.abs_diff(to) != 1 {
            return Err(DocumentError::OutOfBounds {
                line: to,
                column: 1,
            });
        }
        let upper = from.min(to);
        let lower_text = self.remove_line(upper + 1)?;
        self.insert_line(upper, &lower_text)?;
        Ok(())
    }
}

/// Single-character case counterpart of `c`, if one exists.
pub fn toggled_case(c: char) -> Option<char> {
    let mapped: Vec<char> = if c.is_lowercase() {
        c.to_uppercase().collect()
    } else if c.is_uppercase() {
        c.to_lowercase().collect()
    } else {
        return None;
    };
    match mapped.as_slice() {
        [single] if *single != c => Some(*single),
        _ => None,
    }
}

/// Blank characters separate words for word motions.
pub fn is_blank(c: char) -> bool {
    c.is_whitespace()
}

fn is_writable(path: &Path) -> bool {
    fs::OpenOptions::new().append(true).open(path).is_ok()
}

/// Replace every tab with `tab_width` spaces.
pub fn expand_tabs(text: &str, tab_width: usize) -> Cow<'_, str> {
    if text.contains('\t') {
        Cow::Owned(text.replace('\t', &" ".repeat(tab_width)))
    } else {
        Cow::Borrowed(text)
    }
}

/// Result of normalizing line endings.
pub struct NormalizedText {
    /// LF-only content.
    pub normalized: String,
    /// True if more than one ending style was encountered.
    pub mixed: bool,
}

/// Rewrite CRLF and lone CR endings to LF.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let bytes = input.as_bytes();
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                crlf += 1;
                i += 2;
            }
            b'\r' => {
                cr += 1;
                i += 1;
            }
            b'\n' => {
                lf += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    let mixed = [crlf, lf, cr].iter().filter(|c| **c > 0).count() > 1;
    if crlf == 0 && cr == 0 {
        return NormalizedText {
            normalized: input.to_string(),
            mixed,
        };
    }
    NormalizedText {
        normalized: input.replace("\r\n", "\n").replace('\r', "\n"),
        mixed,
    }
}
