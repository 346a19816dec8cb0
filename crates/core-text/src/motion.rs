//! Cursor motion helpers.
//!
//! These operate on a line slice + `Position` pair and are free of editor state.
//! Offsets are byte indices that always rest on a `char` boundary; grapheme
//! clusters are not treated specially.

use crate::Position;

/// Largest char boundary `<= byte` (clamped to the line length).
pub fn floor_char_boundary(line: &str, byte: usize) -> usize {
    if byte >= line.len() {
        return line.len();
    }
    let mut b = byte;
    while b > 0 && !line.is_char_boundary(b) {
        b -= 1;
    }
    b
}

/// Boundary of the char ending at `byte` (0 if already at line start).
pub fn prev_char_boundary(line: &str, byte: usize) -> usize {
    let byte = floor_char_boundary(line, byte);
    line[..byte]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Boundary after the char starting at `byte` (line length if at or past the end).
pub fn next_char_boundary(line: &str, byte: usize) -> usize {
    let byte = floor_char_boundary(line, byte);
    line[byte..]
        .chars()
        .next()
        .map(|c| byte + c.len_utf8())
        .unwrap_or(line.len())
}

/// Move left one char. No-op at column 0.
pub fn left(lines: &[String], pos: &mut Position) {
    if let Some(line) = lines.get(pos.line) {
        pos.byte = prev_char_boundary(line, pos.byte);
    }
}

/// Move right one char. No-op at end of line.
pub fn right(lines: &[String], pos: &mut Position) {
    if let Some(line) = lines.get(pos.line) {
        pos.byte = next_char_boundary(line, pos.byte);
    }
}

/// Move up one line, clamping the column to the target line.
pub fn up(lines: &[String], pos: &mut Position) {
    if pos.line == 0 {
        return;
    }
    pos.line -= 1;
    clamp(lines, pos);
}

/// Move down one line, clamping the column to the target line.
pub fn down(lines: &[String], pos: &mut Position) {
    if pos.line + 1 >= lines.len() {
        return;
    }
    pos.line += 1;
    clamp(lines, pos);
}

/// Clamp a position to the line slice: line index first, then column (floored
/// to a char boundary).
pub fn clamp(lines: &[String], pos: &mut Position) {
    if lines.is_empty() {
        *pos = Position::origin();
        return;
    }
    if pos.line >= lines.len() {
        pos.line = lines.len() - 1;
    }
    pos.byte = floor_char_boundary(&lines[pos.line], pos.byte);
}
