//! Frame assembly and emission.
//!
//! `RenderEngine` owns the only renderer-side state (the viewport). Every
//! frame is a full repaint: compose the `Frame`, then translate leader cells
//! into writer commands row by row, switching attributes only where the flags
//! change.

use std::io::Write;

use anyhow::Result;
use core_complete::keywords;
use core_state::EditorState;
use core_text::Position;
use tracing::trace;

use crate::status::{StatusContext, build_status};
use crate::viewport::Viewport;
use crate::writer::Writer;
use crate::{CellFlags, Frame, char_width};

/// Rows reserved below the text area (status line and message row).
pub const RESERVED_ROWS: u16 = 2;
/// Most completion candidates shown at once.
pub const POPUP_MAX_ROWS: usize = 8;

/// Visual column of byte offset `byte` in `line`, expanding tabs to `tab_size`.
pub fn visual_col(line: &str, byte: usize, tab_size: usize) -> usize {
    let tab = tab_size.max(1);
    let mut col = 0;
    for (idx, ch) in line.char_indices() {
        if idx >= byte {
            break;
        }
        col += if ch == '\t' {
            tab - col % tab
        } else {
            char_width(ch) as usize
        };
    }
    col
}

/// Byte offset of the char covering visual column `col`; past the end of the
/// line this is `line.len()`.
pub fn byte_at_col(line: &str, col: usize, tab_size: usize) -> usize {
    let tab = tab_size.max(1);
    let mut at = 0;
    for (idx, ch) in line.char_indices() {
        let w = if ch == '\t' {
            tab - at % tab
        } else {
            char_width(ch) as usize
        };
        if col < at + w.max(1) {
            return idx;
        }
        at += w;
    }
    line.len()
}

fn gutter_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len().max(3) + 1
}

fn is_keyword(word: &str, ext: Option<&str>) -> bool {
    keywords::GENERAL.iter().any(|k| k.text == word)
        || ext.is_some_and(|e| keywords::for_extension(e).iter().any(|k| k.text == word))
}

/// Byte spans of keywords in `line` (ASCII word boundaries).
fn keyword_spans(line: &str, ext: Option<&str>) -> Vec<(usize, usize)> {
    let bytes = line.as_bytes();
    let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !is_word(bytes[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && is_word(bytes[i]) {
            i += 1;
        }
        if is_keyword(&line[start..i], ext) {
            spans.push((start, i));
        }
    }
    spans
}

#[derive(Debug, Default)]
pub struct RenderEngine {
    viewport: Viewport,
    // gutter columns of the last built frame
    gutter: usize,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Forget scroll state (document replaced).
    pub fn invalidate(&mut self) {
        self.viewport.reset();
    }

    /// Compose a frame of `width` x `height`. Returns the frame and the
    /// screen position of the terminal cursor.
    pub fn build_frame(&mut self, state: &EditorState, width: u16, height: u16) -> (Frame, (u16, u16)) {
        let mut frame = Frame::new(width, height);
        if width == 0 || height == 0 {
            return (frame, (0, 0));
        }
        let text_rows = height.saturating_sub(RESERVED_ROWS) as usize;
        let buffer = &state.buffer;
        let tab = state.settings.tab_size;
        let gutter = if state.settings.line_numbers {
            gutter_width(buffer.line_count()).min(width as usize)
        } else {
            0
        };
        let text_cols = (width as usize).saturating_sub(gutter);
        self.gutter = gutter;
        self.viewport.resize(text_rows, text_cols);

        let cursor = buffer.cursor();
        let cursor_line = buffer.line(cursor.line).unwrap_or("");
        let cursor_col = visual_col(cursor_line, cursor.byte, tab);
        self.viewport.follow(cursor.line, cursor_col);

        let ext = if state.settings.syntax {
            state.file_extension()
        } else {
            None
        };
        for (row, idx) in self.viewport.visible_lines(buffer.line_count()).enumerate() {
            let y = row as u16;
            if gutter > 0 {
                let label = format!("{:>w$} ", idx + 1, w = gutter - 1);
                frame.put_str(0, y, &label, CellFlags::DIM);
            }
            let line = buffer.line(idx).unwrap_or("");
            self.paint_line(&mut frame, y, gutter, line, tab, state.settings.syntax, ext);
        }

        let status_y = height.saturating_sub(RESERVED_ROWS);
        if height >= RESERVED_ROWS {
            let status = build_status(&StatusContext::from_state(state, cursor_col));
            frame.put_str(0, status_y, &status, CellFlags::REVERSE);
            frame.apply_flags_span(0, status_y, width, CellFlags::REVERSE);
        }
        let message_y = height - 1;
        let prompt = state.mode.prompt();
        let message = prompt.as_deref().or(state.status_text()).unwrap_or("");
        let message_end = frame.put_str(0, message_y, message, CellFlags::empty());

        let screen_cursor = if prompt.is_some() {
            (message_end.min(width - 1), message_y)
        } else {
            let x = gutter + cursor_col.saturating_sub(self.viewport.first_col);
            let y = cursor.line.saturating_sub(self.viewport.first_line);
            ((x as u16).min(width - 1), (y as u16).min(status_y.saturating_sub(1)))
        };

        if state.completion.is_active() {
            self.paint_popup(&mut frame, state, screen_cursor, status_y);
        }
        trace!(target: "render", width, height, first_line = self.viewport.first_line, first_col = self.viewport.first_col, "frame_built");
        (frame, screen_cursor)
    }

    /// Document position under screen cell (`x`, `y`) of the last frame. Rows
    /// outside the text area or past the last line give `None`; a cell in the
    /// gutter maps to the line start.
    pub fn hit_test(&self, state: &EditorState, x: u16, y: u16) -> Option<Position> {
        let y = y as usize;
        if y >= self.viewport.height {
            return None;
        }
        let line_idx = self.viewport.first_line + y;
        let line = state.buffer.line(line_idx)?;
        let Some(text_x) = (x as usize).checked_sub(self.gutter) else {
            return Some(Position::new(line_idx, 0));
        };
        let col = self.viewport.first_col + text_x;
        let byte = byte_at_col(line, col, state.settings.tab_size);
        Some(Position::new(line_idx, byte))
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_line(
        &self,
        frame: &mut Frame,
        y: u16,
        gutter: usize,
        line: &str,
        tab: usize,
        syntax: bool,
        ext: Option<&str>,
    ) {
        let spans = if syntax {
            keyword_spans(line, ext)
        } else {
            Vec::new()
        };
        let first_col = self.viewport.first_col;
        let last_col = first_col + self.viewport.width;
        let tab = tab.max(1);
        let mut col = 0usize;
        for (byte, ch) in line.char_indices() {
            if col >= last_col {
                break;
            }
            let flags = if spans.iter().any(|&(s, e)| byte >= s && byte < e) {
                CellFlags::BOLD
            } else {
                CellFlags::empty()
            };
            let w = if ch == '\t' {
                tab - col % tab
            } else {
                char_width(ch) as usize
            };
            if col >= first_col && col + w <= last_col {
                let x = (gutter + col - first_col) as u16;
                if ch == '\t' {
                    frame.put_str(x, y, &" ".repeat(w), flags);
                } else {
                    frame.put_char(x, y, ch, flags);
                }
            }
            col += w;
        }
    }

    fn paint_popup(&self, frame: &mut Frame, state: &EditorState, cursor: (u16, u16), status_y: u16) {
        let candidates = state.completion.candidates();
        let selected = state.completion.index();
        let shown = candidates.len().min(POPUP_MAX_ROWS);
        if shown == 0 {
            return;
        }
        // keep the selected row inside the window
        let start = selected.saturating_sub(shown - 1);
        let rows: Vec<String> = candidates[start..start + shown]
            .iter()
            .map(|k| format!(" {:<10} {} ", k.text, k.description))
            .collect();
        let box_w = rows
            .iter()
            .map(|r| r.chars().map(char_width).sum::<u16>())
            .max()
            .unwrap_or(0)
            .min(frame.width);
        let below = cursor.1 as usize + 1 + shown <= status_y as usize;
        let top = if below {
            cursor.1 + 1
        } else {
            cursor.1.saturating_sub(shown as u16)
        };
        let x = cursor.0.min(frame.width.saturating_sub(box_w));
        for (i, text) in rows.iter().enumerate() {
            let y = top + i as u16;
            if y >= status_y {
                break;
            }
            let flags = if start + i == selected {
                CellFlags::REVERSE
            } else {
                CellFlags::DIM
            };
            for dx in 0..box_w {
                frame.put_char(x + dx, y, ' ', flags);
            }
            frame.put_str(x, y, text, flags);
        }
    }

    /// Compose and emit a full frame to `out`.
    pub fn render<W: Write>(
        &mut self,
        state: &EditorState,
        width: u16,
        height: u16,
        out: &mut W,
    ) -> Result<()> {
        let (frame, (cx, cy)) = self.build_frame(state, width, height);
        let mut w = Writer::new();
        w.hide_cursor();
        for y in 0..frame.height {
            w.move_to(0, y);
            let mut active = CellFlags::empty();
            w.style(active);
            let mut run = String::new();
            for (text, _, flags, _) in frame.row_leaders(y) {
                if flags != active {
                    w.print(std::mem::take(&mut run));
                    w.style(flags);
                    active = flags;
                }
                run.push_str(text);
            }
            w.print(run);
            w.style(CellFlags::empty());
            w.clear_to_eol();
        }
        w.move_to(cx, cy);
        w.show_cursor();
        w.flush_to(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{LineInput, Mode};
    use core_text::{Buffer, Position};
    use pretty_assertions::assert_eq;

    fn mk_state(text: &str) -> EditorState {
        EditorState::new(Buffer::from_text("t", text))
    }

    #[test]
    fn visual_col_expands_tabs_and_wide_chars() {
        assert_eq!(visual_col("\tab", 1, 4), 4);
        assert_eq!(visual_col("a\tb", 2, 4), 4);
        assert_eq!(visual_col("界x", 3, 4), 2);
        assert_eq!(visual_col("abc", 10, 4), 3);
    }

    #[test]
    fn byte_at_col_inverts_visual_col() {
        assert_eq!(byte_at_col("\tab", 2, 4), 0);
        assert_eq!(byte_at_col("\tab", 4, 4), 1);
        assert_eq!(byte_at_col("界x", 1, 4), 0);
        assert_eq!(byte_at_col("界x", 2, 4), 3);
        assert_eq!(byte_at_col("abc", 40, 4), 3);
    }

    #[test]
    fn hit_test_maps_screen_cells_to_document() {
        let text: String = (0..20).map(|i| format!("line{i}\n")).collect();
        let mut st = mk_state(&text);
        st.buffer.set_cursor(Position::new(15, 0));
        let mut engine = RenderEngine::new();
        engine.build_frame(&st, 20, 7);
        // rows 0..5 show lines 11..16 behind a 4-column gutter
        assert_eq!(engine.hit_test(&st, 6, 1), Some(Position::new(12, 2)));
        assert_eq!(engine.hit_test(&st, 1, 0), Some(Position::new(11, 0)));
        assert_eq!(engine.hit_test(&st, 19, 0), Some(Position::new(11, 6)));
        assert_eq!(engine.hit_test(&st, 5, 5), None, "status row");
        let short = mk_state("one");
        engine.invalidate();
        engine.build_frame(&short, 20, 7);
        assert_eq!(engine.hit_test(&short, 5, 3), None, "past the last line");
    }

    #[test]
    fn gutter_and_text_rows() {
        let st = mk_state("alpha\nbeta");
        let mut engine = RenderEngine::new();
        let (frame, cursor) = engine.build_frame(&st, 20, 5);
        assert_eq!(frame.row_text(0), "  1 alpha");
        assert_eq!(frame.row_text(1), "  2 beta");
        assert_eq!(cursor, (4, 0));
        assert!(frame.row_text(3).starts_with("[NORMAL] [No Name]"));
    }

    #[test]
    fn line_numbers_can_be_hidden() {
        let mut st = mk_state("alpha");
        st.settings.line_numbers = false;
        let (frame, _) = RenderEngine::new().build_frame(&st, 20, 4);
        assert_eq!(frame.row_text(0), "alpha");
    }

    #[test]
    fn viewport_follows_cursor() {
        let text: String = (0..20).map(|i| format!("l{i}\n")).collect();
        let mut st = mk_state(&text);
        st.buffer.set_cursor(Position::new(15, 0));
        let mut engine = RenderEngine::new();
        let (frame, cursor) = engine.build_frame(&st, 20, 7);
        assert_eq!(engine.viewport().first_line, 11);
        assert_eq!(frame.row_text(4), " 16 l15");
        assert_eq!(cursor.1, 4);
        engine.invalidate();
        assert_eq!(engine.viewport().first_line, 0);
    }

    #[test]
    fn prompt_replaces_message_row() {
        let mut st = mk_state("x");
        st.set_status("File saved");
        let (frame, _) = RenderEngine::new().build_frame(&st, 20, 4);
        assert_eq!(frame.row_text(3), "File saved");
        st.mode = Mode::Command(LineInput::from("wq"));
        let (frame, cursor) = RenderEngine::new().build_frame(&st, 20, 4);
        assert_eq!(frame.row_text(3), ":wq");
        assert_eq!(cursor, (3, 3));
    }

    #[test]
    fn keywords_are_bold_when_syntax_on() {
        let mut st = mk_state("for x");
        st.settings.line_numbers = false;
        let (frame, _) = RenderEngine::new().build_frame(&st, 10, 3);
        assert_eq!(frame.flags_at(0, 0), Some(CellFlags::BOLD));
        assert_eq!(frame.flags_at(4, 0), Some(CellFlags::empty()));
        st.settings.syntax = false;
        let (frame, _) = RenderEngine::new().build_frame(&st, 10, 3);
        assert_eq!(frame.flags_at(0, 0), Some(CellFlags::empty()));
    }

    #[test]
    fn render_writes_escape_sequences() {
        let st = mk_state("hello");
        let mut out = Vec::new();
        RenderEngine::new().render(&st, 20, 4, &mut out).unwrap();
        let s = String::from_utf8_lossy(&out);
        assert!(s.contains("hello"));
        assert!(s.contains("NORMAL"));
    }
}
