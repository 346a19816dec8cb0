//! Line-vector text buffer with an owned cursor.
//!
//! The document is an ordered `Vec<String>` (one entry per line, no newline
//! characters stored) that is never empty. The cursor is a `(line, byte)`
//! `Position` kept valid against the document: every mutation below re-clamps
//! it before returning, so callers never observe an out-of-range cursor.
//!
//! Mutations return the `EditRecord` needed to invert them. The buffer itself
//! keeps no history; `core-state` owns the undo/redo stacks and replays records
//! through `apply` / `revert`.

use thiserror::Error;
use tracing::warn;

pub mod edit;
pub mod motion;

pub use edit::{EditRecord, LineChange};

/// Default cap on a single line's byte length (insert refuses beyond it).
pub const MAX_LINE_LENGTH: usize = 10_000;

/// A position inside a buffer expressed as (line index, byte offset within that line).
/// Byte offsets are kept on UTF-8 char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub byte: usize,
}

impl Position {
    pub fn new(line: usize, byte: usize) -> Self {
        Self { line, byte }
    }
    pub fn origin() -> Self {
        Self { line: 0, byte: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("Warning: Line length limit reached ({limit} bytes)")]
    LineTooLong { limit: usize },
}

/// Counts reported by `:wc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
}

/// Outcome of a document-wide literal replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplaceOutcome {
    pub records: Vec<EditRecord>,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
    cursor: Position,
    dirty: bool,
    max_line_len: usize,
    name: String,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new("untitled")
    }
}

impl Buffer {
    /// Empty document: a single zero-length line.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Position::origin(),
            dirty: false,
            max_line_len: MAX_LINE_LENGTH,
            name: name.into(),
        }
    }

    /// Construct a buffer from in-memory text (newline separated, CRLF tolerated).
    pub fn from_text(name: impl Into<String>, content: &str) -> Self {
        let mut buf = Self::new(name);
        buf.load_document(split_lines(content));
        buf
    }

    /// Construct a buffer from pre-split lines.
    pub fn from_lines<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buf = Self::new(name);
        buf.load_document(lines.into_iter().map(Into::into).collect());
        buf
    }

    pub fn with_max_line_len(mut self, max: usize) -> Self {
        self.max_line_len = max.max(1);
        self
    }

    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }

    /// Display name (file path or placeholder).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Total number of lines (always >= 1).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_byte_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map(String::len).unwrap_or(0)
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Move the cursor to `pos`, clamped to the document.
    pub fn set_cursor(&mut self, pos: Position) {
        let mut pos = pos;
        motion::clamp(&self.lines, &mut pos);
        self.cursor = pos;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag (after a successful save).
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Document text with every line newline-terminated.
    pub fn to_text(&self) -> String {
        let cap = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut out = String::with_capacity(cap);
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn stats(&self) -> TextStats {
        TextStats {
            lines: self.lines.len(),
            words: self.lines.iter().map(|l| l.split_whitespace().count()).sum(),
            chars: self.lines.iter().map(|l| l.chars().count()).sum(),
        }
    }

    /// Move the cursor by `dx` chars and `dy` lines, clamped to the document.
    /// Returns true if the cursor moved.
    pub fn move_cursor(&mut self, dx: isize, dy: isize) -> bool {
        let before = self.cursor;
        let mut pos = self.cursor;
        for _ in 0..dy.unsigned_abs() {
            if dy < 0 {
                motion::up(&self.lines, &mut pos);
            } else {
                motion::down(&self.lines, &mut pos);
            }
        }
        for _ in 0..dx.unsigned_abs() {
            if dx < 0 {
                motion::left(&self.lines, &mut pos);
            } else {
                motion::right(&self.lines, &mut pos);
            }
        }
        self.cursor = pos;
        before != pos
    }

    /// Insert `ch` at the cursor and advance past it. A newline is treated as
    /// `split_line`. Refused when the current line is at the length cap.
    pub fn insert_char(&mut self, ch: char) -> Result<EditRecord, BufferError> {
        if ch == '\n' {
            return Ok(self.split_line());
        }
        let at = self.cursor;
        let line = &mut self.lines[at.line];
        if line.len() >= self.max_line_len {
            return Err(BufferError::LineTooLong {
                limit: self.max_line_len,
            });
        }
        line.insert(at.byte, ch);
        self.cursor.byte += ch.len_utf8();
        self.dirty = true;
        Ok(EditRecord::InsertChar { at, ch })
    }

    /// Remove the char before the cursor. No-op at column 0.
    pub fn delete_char_before(&mut self) -> Option<EditRecord> {
        let at = self.cursor;
        if at.byte == 0 {
            return None;
        }
        let line = &mut self.lines[at.line];
        let prev = motion::prev_char_boundary(line, at.byte);
        let ch = line.remove(prev);
        self.cursor.byte = prev;
        self.dirty = true;
        Some(EditRecord::DeleteChar {
            at: Position::new(at.line, prev),
            ch,
        })
    }

    /// Split the current line at the cursor; cursor moves to the start of the new line.
    pub fn split_line(&mut self) -> EditRecord {
        let at = self.cursor;
        let tail = self.lines[at.line].split_off(at.byte);
        self.lines.insert(at.line + 1, tail);
        self.cursor = Position::new(at.line + 1, 0);
        self.dirty = true;
        EditRecord::SplitLine { at }
    }

    /// Append the current line to the previous one. No-op on the first line.
    pub fn join_with_previous(&mut self) -> Option<EditRecord> {
        let row = self.cursor.line;
        if row == 0 {
            return None;
        }
        let current = self.lines.remove(row);
        let join_byte = self.lines[row - 1].len();
        self.lines[row - 1].push_str(&current);
        self.cursor = Position::new(row - 1, join_byte);
        self.dirty = true;
        Some(EditRecord::JoinLines { row, join_byte })
    }

    /// Replace the whole content of `row`. Returns `None` when the row does not
    /// exist or the text is unchanged. `text` must not contain newlines.
    pub fn replace_line(&mut self, row: usize, text: &str) -> Option<EditRecord> {
        debug_assert!(!text.contains('\n'), "line content cannot hold newlines");
        let current = self.lines.get_mut(row)?;
        if current == text {
            return None;
        }
        let before = std::mem::replace(current, text.to_string());
        let cursor_before = self.cursor;
        motion::clamp(&self.lines, &mut self.cursor);
        self.dirty = true;
        Some(EditRecord::ReplaceLine {
            change: LineChange {
                row,
                before,
                after: text.to_string(),
            },
            cursor_before,
            cursor_after: self.cursor,
        })
    }

    /// Replace bytes `[start,end)` of `row` with `text`; the cursor lands right
    /// after the inserted text. `Ok(None)` for a missing row or a range off
    /// char boundaries.
    pub fn replace_range(
        &mut self,
        row: usize,
        start: usize,
        end: usize,
        text: &str,
    ) -> Result<Option<EditRecord>, BufferError> {
        let Some(line) = self.lines.get(row) else {
            return Ok(None);
        };
        if start > end
            || end > line.len()
            || !line.is_char_boundary(start)
            || !line.is_char_boundary(end)
        {
            return Ok(None);
        }
        let mut after = String::with_capacity(line.len() - (end - start) + text.len());
        after.push_str(&line[..start]);
        after.push_str(text);
        after.push_str(&line[end..]);
        self.check_growth(line, &after)?;
        let cursor_before = self.cursor;
        let before = std::mem::replace(&mut self.lines[row], after.clone());
        self.cursor = Position::new(row, start + text.len());
        self.dirty = true;
        Ok(Some(EditRecord::ReplaceLine {
            change: LineChange { row, before, after },
            cursor_before,
            cursor_after: self.cursor,
        }))
    }

    /// Lines may not grow past the cap. Shrinking an over-long loaded line is fine.
    fn check_growth(&self, before: &str, after: &str) -> Result<(), BufferError> {
        if after.len() > self.max_line_len && after.len() > before.len() {
            return Err(BufferError::LineTooLong {
                limit: self.max_line_len,
            });
        }
        Ok(())
    }

    /// Replace every literal occurrence of `old` with `new` on every line.
    ///
    /// With `group == false` one `ReplaceLine` record is produced per modified
    /// line; with `group == true` a single `BulkReplace` covers all of them.
    /// If any line would grow past the length cap nothing is replaced.
    pub fn replace_all(
        &mut self,
        old: &str,
        new: &str,
        group: bool,
    ) -> Result<ReplaceOutcome, BufferError> {
        let mut outcome = ReplaceOutcome::default();
        if old.is_empty() {
            return Ok(outcome);
        }
        let mut changes = Vec::new();
        for (row, line) in self.lines.iter().enumerate() {
            let count = line.matches(old).count();
            if count > 0 {
                let after = line.replace(old, new);
                self.check_growth(line, &after)?;
                outcome.occurrences += count;
                changes.push(LineChange {
                    row,
                    before: line.clone(),
                    after,
                });
            }
        }
        // Identity replacements (old == new) still count but change nothing.
        changes.retain(|c| c.before != c.after);
        if changes.is_empty() {
            return Ok(outcome);
        }
        if group {
            let cursor_before = self.cursor;
            for c in &changes {
                self.lines[c.row].clone_from(&c.after);
            }
            motion::clamp(&self.lines, &mut self.cursor);
            self.dirty = true;
            outcome.records.push(EditRecord::BulkReplace {
                changes,
                cursor_before,
                cursor_after: self.cursor,
            });
        } else {
            for c in changes {
                if let Some(rec) = self.replace_line(c.row, &c.after) {
                    outcome.records.push(rec);
                }
            }
        }
        Ok(outcome)
    }

    /// Replace the entire document. Cursor resets to the origin and the dirty
    /// flag clears. Not an edit: no record is produced.
    pub fn load_document(&mut self, lines: Vec<String>) {
        self.lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        self.cursor = Position::origin();
        self.dirty = false;
    }

    /// Replay a record's forward effect (redo).
    pub fn apply(&mut self, record: &EditRecord) -> bool {
        let ok = record.apply_to(&mut self.lines);
        self.finish_replay(ok, record, record.cursor_after(), "apply")
    }

    /// Replay a record's inverse effect (undo).
    pub fn revert(&mut self, record: &EditRecord) -> bool {
        let ok = record.revert_on(&mut self.lines);
        self.finish_replay(ok, record, record.cursor_before(), "revert")
    }

    fn finish_replay(
        &mut self,
        ok: bool,
        record: &EditRecord,
        cursor: Position,
        op: &'static str,
    ) -> bool {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        if ok {
            self.cursor = cursor;
            self.dirty = true;
        } else {
            warn!(target: "text.buffer", op, kind = record.kind(), "record_mismatch");
        }
        motion::clamp(&self.lines, &mut self.cursor);
        ok
    }
}

/// Split file text into document lines. A trailing newline terminates the last
/// record rather than starting an empty one; `\r\n` is accepted.
pub fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(str::to_string).collect()
}
