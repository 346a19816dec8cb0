//! Undo / Redo dispatch. Empty stacks are silent no-ops.

use super::DispatchResult;
use core_state::EditorState;

pub(crate) fn handle_undo(state: &mut EditorState) -> DispatchResult {
    let before = state.buffer.line_count();
    if state.undo() {
        let after = state.buffer.line_count();
        tracing::trace!(target: "actions.dispatch", op = "undo", line_count_changed = (before != after), "undo");
        if before != after {
            DispatchResult::buffer_replaced()
        } else {
            DispatchResult::dirty()
        }
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_redo(state: &mut EditorState) -> DispatchResult {
    let before = state.buffer.line_count();
    if state.redo() {
        let after = state.buffer.line_count();
        tracing::trace!(target: "actions.dispatch", op = "redo", line_count_changed = (before != after), "redo");
        if before != after {
            DispatchResult::buffer_replaced()
        } else {
            DispatchResult::dirty()
        }
    } else {
        DispatchResult::clean()
    }
}
