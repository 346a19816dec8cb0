//! Text edit action handling (insert/backspace/newline).
//!
//! One keypress produces at most one `EditRecord`, committed to history
//! immediately, so typing undoes char by char. Edits outside Insert mode are
//! ignored.

use super::DispatchResult;
use crate::EditKind;
use core_state::{EditorState, Mode};

pub(crate) fn handle_edit(kind: EditKind, state: &mut EditorState) -> DispatchResult {
    if !matches!(state.mode, Mode::Insert) {
        return DispatchResult::clean();
    }
    let before = state.buffer.cursor();
    let record = match kind {
        EditKind::InsertChar(ch) => match state.buffer.insert_char(ch) {
            Ok(rec) => Some(rec),
            Err(e) => {
                tracing::warn!(target: "actions.dispatch", op = "insert_char", line = before.line, error = %e, "edit_refused");
                state.set_status(e.to_string());
                return DispatchResult::dirty();
            }
        },
        EditKind::Newline => Some(state.buffer.split_line()),
        EditKind::Backspace => {
            if before.byte > 0 {
                state.buffer.delete_char_before()
            } else {
                state.buffer.join_with_previous()
            }
        }
    };
    let Some(record) = record else {
        return DispatchResult::clean();
    };
    let after = state.buffer.cursor();
    tracing::trace!(target: "actions.dispatch", op = record.kind(), line = before.line, byte = before.byte, to_line = after.line, to_byte = after.byte, "edit");
    let structural = matches!(kind, EditKind::Newline) || after.line != before.line;
    state.commit(record);
    if structural {
        DispatchResult::buffer_replaced()
    } else {
        DispatchResult::dirty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{Buffer, Position};

    fn insert_state(text: &str) -> EditorState {
        let mut st = EditorState::new(Buffer::from_text("t", text));
        st.set_mode(Mode::Insert);
        st
    }

    #[test]
    fn backspace_at_col_zero_joins() {
        let mut st = insert_state("abc\ndef");
        st.buffer.set_cursor(Position::new(1, 0));
        handle_edit(EditKind::Backspace, &mut st);
        assert_eq!(st.buffer.lines(), &["abcdef".to_string()]);
        assert_eq!(st.buffer.cursor(), Position::new(0, 3));
        assert_eq!(st.history.undo_depth(), 1);
    }

    #[test]
    fn backspace_at_origin_records_nothing() {
        let mut st = insert_state("abc");
        let res = handle_edit(EditKind::Backspace, &mut st);
        assert!(!res.dirty);
        assert_eq!(st.history.undo_depth(), 0);
    }

    #[test]
    fn line_cap_sets_status_without_change() {
        let mut st = insert_state("abc");
        st.buffer = Buffer::from_text("t", "abc").with_max_line_len(3);
        handle_edit(EditKind::InsertChar('d'), &mut st);
        assert_eq!(st.buffer.line(0), Some("abc"));
        assert_eq!(st.history.undo_depth(), 0);
        assert!(st.status_text().unwrap().contains("Line length limit reached"));
    }

    #[test]
    fn edits_ignored_outside_insert() {
        let mut st = EditorState::new(Buffer::from_text("t", "abc"));
        assert!(!handle_edit(EditKind::InsertChar('x'), &mut st).dirty);
        assert_eq!(st.buffer.line(0), Some("abc"));
    }
}
