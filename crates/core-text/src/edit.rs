//! Reversible edit records.
//!
//! Each `EditRecord` describes one logical change as a delta against the line
//! vector (affected rows plus before/after text) rather than a snapshot of the
//! whole document. A record can be replayed forward (`apply_to`) or inverted
//! (`revert_on`) provided the lines are in the state the record was captured
//! against; the history stacks guarantee that ordering.
//!
//! Replay is checked: if row indices or char boundaries do not line up the
//! mutation is skipped and `false` is returned so callers can log the mismatch
//! instead of panicking mid-session.

use crate::Position;

/// Whole-line before/after pair for a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub row: usize,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRecord {
    /// `ch` inserted at `at`; cursor moved past it.
    InsertChar { at: Position, ch: char },
    /// `ch` removed from `at` (the char started at `at`); cursor was just after it.
    DeleteChar { at: Position, ch: char },
    /// Line `at.line` split at `at.byte`; cursor moved to the start of the new line.
    SplitLine { at: Position },
    /// Line `row` appended to line `row - 1` whose original length was `join_byte`.
    JoinLines { row: usize, join_byte: usize },
    /// One line replaced wholesale (search-and-replace, completion).
    ReplaceLine {
        change: LineChange,
        cursor_before: Position,
        cursor_after: Position,
    },
    /// Several lines replaced as one undo step; line count is unchanged.
    BulkReplace {
        changes: Vec<LineChange>,
        cursor_before: Position,
        cursor_after: Position,
    },
}

impl EditRecord {
    /// Short stable name used in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            EditRecord::InsertChar { .. } => "insert_char",
            EditRecord::DeleteChar { .. } => "delete_char",
            EditRecord::SplitLine { .. } => "split_line",
            EditRecord::JoinLines { .. } => "join_lines",
            EditRecord::ReplaceLine { .. } => "replace_line",
            EditRecord::BulkReplace { .. } => "bulk_replace",
        }
    }

    pub fn cursor_before(&self) -> Position {
        match self {
            EditRecord::InsertChar { at, .. } | EditRecord::SplitLine { at } => *at,
            EditRecord::DeleteChar { at, ch } => Position::new(at.line, at.byte + ch.len_utf8()),
            EditRecord::JoinLines { row, .. } => Position::new(*row, 0),
            EditRecord::ReplaceLine { cursor_before, .. }
            | EditRecord::BulkReplace { cursor_before, .. } => *cursor_before,
        }
    }

    pub fn cursor_after(&self) -> Position {
        match self {
            EditRecord::InsertChar { at, ch } => Position::new(at.line, at.byte + ch.len_utf8()),
            EditRecord::DeleteChar { at, .. } => *at,
            EditRecord::SplitLine { at } => Position::new(at.line + 1, 0),
            EditRecord::JoinLines { row, join_byte } => {
                Position::new(row.saturating_sub(1), *join_byte)
            }
            EditRecord::ReplaceLine { cursor_after, .. }
            | EditRecord::BulkReplace { cursor_after, .. } => *cursor_after,
        }
    }

    /// Replay the forward effect onto `lines`.
    pub(crate) fn apply_to(&self, lines: &mut Vec<String>) -> bool {
        match self {
            EditRecord::InsertChar { at, ch } => insert_at(lines, *at, *ch),
            EditRecord::DeleteChar { at, ch } => remove_at(lines, *at, *ch),
            EditRecord::SplitLine { at } => split_at(lines, *at),
            EditRecord::JoinLines { row, join_byte } => join_into_previous(lines, *row, *join_byte),
            EditRecord::ReplaceLine { change, .. } => set_line(lines, change.row, &change.after),
            EditRecord::BulkReplace { changes, .. } => changes
                .iter()
                .all(|c| set_line(lines, c.row, &c.after)),
        }
    }

    /// Apply the inverse effect onto `lines`.
    pub(crate) fn revert_on(&self, lines: &mut Vec<String>) -> bool {
        match self {
            EditRecord::InsertChar { at, ch } => remove_at(lines, *at, *ch),
            EditRecord::DeleteChar { at, ch } => insert_at(lines, *at, *ch),
            EditRecord::SplitLine { at } => {
                if at.line + 1 >= lines.len() {
                    return false;
                }
                let tail = lines.remove(at.line + 1);
                lines[at.line].push_str(&tail);
                true
            }
            EditRecord::JoinLines { row, join_byte } => {
                if *row == 0 || *row > lines.len() {
                    return false;
                }
                split_at(lines, Position::new(row - 1, *join_byte))
            }
            EditRecord::ReplaceLine { change, .. } => set_line(lines, change.row, &change.before),
            EditRecord::BulkReplace { changes, .. } => changes
                .iter()
                .rev()
                .all(|c| set_line(lines, c.row, &c.before)),
        }
    }
}

fn insert_at(lines: &mut [String], at: Position, ch: char) -> bool {
    match lines.get_mut(at.line) {
        Some(line) if at.byte <= line.len() && line.is_char_boundary(at.byte) => {
            line.insert(at.byte, ch);
            true
        }
        _ => false,
    }
}

fn remove_at(lines: &mut [String], at: Position, ch: char) -> bool {
    match lines.get_mut(at.line) {
        Some(line) if line.get(at.byte..).is_some_and(|rest| rest.starts_with(ch)) => {
            line.remove(at.byte);
            true
        }
        _ => false,
    }
}

fn split_at(lines: &mut Vec<String>, at: Position) -> bool {
    match lines.get_mut(at.line) {
        Some(line) if at.byte <= line.len() && line.is_char_boundary(at.byte) => {
            let tail = line.split_off(at.byte);
            lines.insert(at.line + 1, tail);
            true
        }
        _ => false,
    }
}

fn join_into_previous(lines: &mut Vec<String>, row: usize, join_byte: usize) -> bool {
    if row == 0 || row >= lines.len() || lines[row - 1].len() != join_byte {
        return false;
    }
    let current = lines.remove(row);
    lines[row - 1].push_str(&current);
    true
}

fn set_line(lines: &mut [String], row: usize, text: &str) -> bool {
    match lines.get_mut(row) {
        Some(line) => {
            line.clear();
            line.push_str(text);
            true
        }
        None => false,
    }
}
