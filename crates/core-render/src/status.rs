//! Status bar composition.
//!
//! Two-stage pipeline:
//! 1. `compose_status` produces an ordered vector of `StatusSegment`s from a
//!    `StatusContext`.
//! 2. `format_status` lays the segments out on exactly `width` columns.
//!
//! Layout: `MODE | flags | [N] |` on the left, the file name centered,
//! `| branch | L:C` on the right. Flags are `RO` and/or `X` (modified);
//! segments with nothing to show are omitted together with their separator.
//! A file name at least `width / 3` characters long is shortened to `...`
//! followed by its last `width / 3` characters.

use core_state::Mode;

/// What the status bar needs to know about the session.
pub struct StatusContext<'a> {
    pub mode: &'a Mode,
    pub read_only: bool,
    pub modified: bool,
    pub open_buffers: usize,
    pub file_name: &'a str,
    pub branch: Option<&'a str>,
    /// 1-based cursor line.
    pub line: usize,
    /// 1-based cursor column.
    pub column: usize,
}

/// Discrete status bar segments (order-sensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Mode(&'static str),
    Flags { read_only: bool, modified: bool },
    BufferCount(usize),
    FileName(&'a str),
    Branch(&'a str),
    Position { line: usize, column: usize },
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut out = Vec::with_capacity(6);
    out.push(StatusSegment::Mode(ctx.mode.label()));
    if ctx.read_only || ctx.modified {
        out.push(StatusSegment::Flags {
            read_only: ctx.read_only,
            modified: ctx.modified,
        });
    }
    if ctx.open_buffers > 1 {
        out.push(StatusSegment::BufferCount(ctx.open_buffers));
    }
    out.push(StatusSegment::FileName(ctx.file_name));
    if let Some(branch) = ctx.branch.filter(|b| !b.is_empty()) {
        out.push(StatusSegment::Branch(branch));
    }
    out.push(StatusSegment::Position {
        line: ctx.line,
        column: ctx.column,
    });
    out
}

/// Lay segments out on exactly `width` characters.
pub fn format_status(segments: &[StatusSegment<'_>], width: usize) -> String {
    let mut left = String::new();
    let mut right = String::new();
    let mut name = "";
    for seg in segments {
        match seg {
            StatusSegment::Mode(m) => {
                left.push(' ');
                left.push_str(m);
            }
            StatusSegment::Flags {
                read_only,
                modified,
            } => {
                let flags = match (*read_only, *modified) {
                    (true, true) => "RO X",
                    (true, false) => "RO",
                    _ => "X",
                };
                left.push_str(" | ");
                left.push_str(flags);
            }
            StatusSegment::BufferCount(n) => {
                left.push_str(&format!(" | [{n}]"));
            }
            StatusSegment::FileName(n) => name = n,
            StatusSegment::Branch(b) => {
                right.push_str("| ");
                right.push_str(b);
                right.push(' ');
            }
            StatusSegment::Position { line, column } => {
                right.push_str(&format!("| {line}:{column} "));
            }
        }
    }
    left.push_str(" |");

    let visible = truncate_file_name(name, width);
    let left_len = left.chars().count();
    let right_len = right.chars().count();
    let name_len = visible.chars().count();
    let thirds = width / 3;
    let lhs_padding = (width / 2)
        .saturating_sub(name_len / 2)
        .saturating_sub(left_len)
        .min(thirds);
    let used = left_len + lhs_padding + name_len + right_len;
    let rhs_padding = width.saturating_sub(used);

    let mut bar = String::with_capacity(width);
    bar.push_str(&left);
    bar.extend(std::iter::repeat_n(' ', lhs_padding));
    bar.push_str(&visible);
    bar.extend(std::iter::repeat_n(' ', rhs_padding));
    bar.push_str(&right);
    fit(bar, width)
}

/// `...` + the last `width / 3` characters when the name is that long.
pub fn truncate_file_name(name: &str, width: usize) -> String {
    let thirds = width / 3;
    let len = name.chars().count();
    if thirds == 0 || len < thirds {
        return name.to_string();
    }
    let tail: String = name.chars().skip(len - thirds).collect();
    format!("...{tail}")
}

/// Clip or pad to exactly `width` characters.
fn fit(bar: String, width: usize) -> String {
    let len = bar.chars().count();
    if len <= width {
        let mut out = bar;
        out.extend(std::iter::repeat_n(' ', width - len));
        return out;
    }
    bar.chars().take(width).collect()
}
