//! Rendering: frame assembly from read-only editor state.
//!
//! The renderer never mutates editing state. Each frame is composed into a
//! logical `Frame` grid and then emitted row by row through `writer::Writer`.
//!
//! Screen layout (top to bottom):
//! - text rows, optionally prefixed by a line number gutter
//! - the status line (mode, file, file type, cursor position)
//! - the message row (active prompt, or the ephemeral status message)
//!
//! Cells hold one char each plus its display width. Wide chars occupy a leader
//! cell followed by continuation cells (width 0) that never print. Tabs expand
//! to spaces using the configured tab size.

use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

pub mod render_engine;
pub mod status;
pub mod viewport;
pub mod writer;

pub use render_engine::RenderEngine;
pub use viewport::Viewport;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001; // reverse video (status line, popup selection)
        const DIM     = 0b0000_0010; // line number gutter, popup descriptions
        const BOLD    = 0b0000_0100; // keyword highlight
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Printable text (leader cells only). Empty for continuation cells.
    pub text: String,
    /// Display width in columns. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
}

impl Cell {
    pub fn leader(text: &str, width: u16, flags: CellFlags) -> Self {
        Self {
            text: text.to_string(),
            width: width.clamp(1, u8::MAX as u16) as u8,
            flags,
        }
    }

    pub fn continuation(flags: CellFlags) -> Self {
        Self {
            text: String::new(),
            width: 0,
            flags,
        }
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            text: " ".to_string(),
            width: 1,
            flags: CellFlags::empty(),
        }
    }
}

/// Display width of `ch`; control chars render as one replacement column.
pub fn char_width(ch: char) -> u16 {
    UnicodeWidthChar::width(ch).unwrap_or(1).max(1) as u16
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Place `ch` at (x,y). Returns the column after it, or `None` when it did
    /// not fit (wide chars are never split at the right edge).
    pub fn put_char(&mut self, x: u16, y: u16, ch: char, flags: CellFlags) -> Option<u16> {
        let w = char_width(ch);
        if y >= self.height || x.checked_add(w)? > self.width {
            return None;
        }
        let text = if ch.is_control() {
            "?".to_string()
        } else {
            ch.to_string()
        };
        let idx = self.index(x, y)?;
        self.cells[idx] = Cell::leader(&text, w, flags);
        for dx in 1..w {
            if let Some(c_idx) = self.index(x + dx, y) {
                self.cells[c_idx] = Cell::continuation(flags);
            }
        }
        Some(x + w)
    }

    /// Write `s` from column `x`, truncating at the right edge. Returns the
    /// column after the last char written.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, flags: CellFlags) -> u16 {
        let mut col = x;
        for ch in s.chars() {
            match self.put_char(col, y, ch, flags) {
                Some(next) => col = next,
                None => break,
            }
        }
        col
    }

    /// OR `flags` into every cell of row `y` from `x` for `span` columns.
    pub fn apply_flags_span(&mut self, x: u16, y: u16, span: u16, flags: CellFlags) {
        let span = span.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    /// Leader cells of a row as `(text, width, flags, x)`.
    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (&str, u16, CellFlags, u16)> + '_ {
        let width = self.width;
        let start = y as usize * width as usize;
        let mut x = 0u16;
        std::iter::from_fn(move || {
            while x < width {
                let cell = &self.cells[start + x as usize];
                if cell.is_leader() {
                    let w = cell.width as u16;
                    let out = (cell.text.as_str(), w, cell.flags, x);
                    x = x.saturating_add(w);
                    return Some(out);
                }
                x += 1;
            }
            None
        })
    }

    /// Row text with trailing blanks removed (tests and diagnostics).
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let s: String = self.row_leaders(y).map(|(t, ..)| t).collect();
        s.trim_end().to_string()
    }

    pub fn flags_at(&self, x: u16, y: u16) -> Option<CellFlags> {
        self.index(x, y).map(|i| self.cells[i].flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_char_gets_continuation() {
        let mut f = Frame::new(4, 1);
        let next = f.put_char(0, 0, '界', CellFlags::empty());
        assert_eq!(next, Some(2));
        assert!(f.cells[0].is_leader());
        assert!(!f.cells[1].is_leader());
        assert_eq!(f.row_text(0), "界");
    }

    #[test]
    fn wide_char_not_split_at_edge() {
        let mut f = Frame::new(3, 1);
        let end = f.put_str(0, 0, "ab界", CellFlags::empty());
        assert_eq!(end, 2);
        assert_eq!(f.row_text(0), "ab");
    }

    #[test]
    fn control_chars_render_placeholder() {
        let mut f = Frame::new(3, 1);
        f.put_str(0, 0, "a\u{1}", CellFlags::empty());
        assert_eq!(f.row_text(0), "a?");
    }

    #[test]
    fn flags_span_clamped_to_width() {
        let mut f = Frame::new(3, 1);
        f.apply_flags_span(1, 0, 10, CellFlags::REVERSE);
        assert_eq!(f.flags_at(0, 0), Some(CellFlags::empty()));
        assert_eq!(f.flags_at(2, 0), Some(CellFlags::REVERSE));
    }
}
