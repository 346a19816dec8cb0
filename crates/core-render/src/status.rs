//! Status line composition.
//!
//! Format: `[MODE] <name>[*] | <type> | Ln X, Col Y | N lines`
//! * `<name>` is the base file name or `[No Name]` for an unnamed buffer.
//! * `*` appears only when the buffer is dirty.
//! * `<type>` is the file type label (`New File`, `Text` or the extension).
//! * ` (partial)` follows the line count when only a head of the file is loaded.
//!
//! Composition is two-stage: `compose_status` yields ordered segments and
//! `format_status` renders them, so callers can drop or reorder segments
//! (e.g. for narrow terminals) without string surgery.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;

use core_state::EditorState;

pub struct StatusContext<'a> {
    pub mode: &'static str,
    pub file_name: Option<&'a Path>,
    pub dirty: bool,
    pub file_type: &'a str,
    /// 0-based cursor line.
    pub line: usize,
    /// 0-based visual column.
    pub col: usize,
    pub line_count: usize,
    pub partial: bool,
}

impl<'a> StatusContext<'a> {
    pub fn from_state(state: &'a EditorState, col: usize) -> Self {
        Self {
            mode: state.mode.label(),
            file_name: state.file_name.as_deref(),
            dirty: state.is_dirty(),
            file_type: state.file_type(),
            line: state.buffer.cursor().line,
            col,
            line_count: state.buffer.line_count(),
            partial: state.partial.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Mode(&'static str),
    FileName(Cow<'a, str>),
    FileType(&'a str),
    /// 1-based cursor line and column.
    Position { line_1: usize, col_1: usize },
    LineCount { lines: usize, partial: bool },
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let name: Cow<'_, str> = match ctx.file_name.and_then(|p| p.file_name()) {
        Some(n) => n.to_string_lossy(),
        None => Cow::Borrowed("[No Name]"),
    };
    let name = if ctx.dirty {
        Cow::Owned(format!("{name}*"))
    } else {
        name
    };
    vec![
        StatusSegment::Mode(ctx.mode),
        StatusSegment::FileName(name),
        StatusSegment::FileType(ctx.file_type),
        StatusSegment::Position {
            line_1: ctx.line + 1,
            col_1: ctx.col + 1,
        },
        StatusSegment::LineCount {
            lines: ctx.line_count,
            partial: ctx.partial,
        },
    ]
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut s = String::with_capacity(64);
    for (i, seg) in segments.iter().enumerate() {
        match seg {
            StatusSegment::Mode(m) => {
                let _ = write!(s, "[{m}]");
            }
            StatusSegment::FileName(name) => {
                s.push(' ');
                s.push_str(name);
            }
            other => {
                if i > 0 {
                    s.push_str(" | ");
                }
                match other {
                    StatusSegment::FileType(t) => s.push_str(t),
                    StatusSegment::Position { line_1, col_1 } => {
                        let _ = write!(s, "Ln {line_1}, Col {col_1}");
                    }
                    StatusSegment::LineCount { lines, partial } => {
                        let _ = write!(s, "{lines} lines");
                        if *partial {
                            s.push_str(" (partial)");
                        }
                    }
                    StatusSegment::Mode(_) | StatusSegment::FileName(_) => {}
                }
            }
        }
    }
    s
}

pub fn build_status(ctx: &StatusContext) -> String {
    format_status(&compose_status(ctx))
}
