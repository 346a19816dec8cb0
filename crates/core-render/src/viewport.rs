//! Visible window into the document.
//!
//! `first_line` is the topmost document row shown; `first_col` the leftmost
//! visual column of the text area. `follow` scrolls the minimum amount needed
//! to keep the cursor inside the window.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub first_line: usize,
    pub first_col: usize,
    /// Text rows available (excludes status and message rows).
    pub height: usize,
    /// Text columns available (excludes the line number gutter).
    pub width: usize,
}

impl Viewport {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            first_line: 0,
            first_col: 0,
            height,
            width,
        }
    }

    pub fn resize(&mut self, height: usize, width: usize) {
        self.height = height;
        self.width = width;
    }

    /// Back to the top-left corner (document replaced).
    pub fn reset(&mut self) {
        self.first_line = 0;
        self.first_col = 0;
    }

    /// Scroll so that (`line`, visual `col`) is visible.
    pub fn follow(&mut self, line: usize, col: usize) {
        if self.height == 0 || self.width == 0 {
            return;
        }
        if line < self.first_line {
            self.first_line = line;
        } else if line >= self.first_line + self.height {
            self.first_line = line + 1 - self.height;
        }
        if col < self.first_col {
            self.first_col = col;
        } else if col >= self.first_col + self.width {
            self.first_col = col + 1 - self.width;
        }
    }

    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.first_line && line < self.first_line + self.height
    }

    /// Document rows currently in view, clipped to `line_count`.
    pub fn visible_lines(&self, line_count: usize) -> std::ops::Range<usize> {
        let end = (self.first_line + self.height).min(line_count);
        self.first_line.min(end)..end
    }
}
