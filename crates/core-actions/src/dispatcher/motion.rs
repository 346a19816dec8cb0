//! Cursor movement.

use super::DispatchResult;
use crate::MotionKind;
use core_state::EditorState;

pub(crate) fn handle_motion(kind: MotionKind, state: &mut EditorState) -> DispatchResult {
    let (dx, dy) = match kind {
        MotionKind::Left => (-1, 0),
        MotionKind::Right => (1, 0),
        MotionKind::Up => (0, -1),
        MotionKind::Down => (0, 1),
    };
    let before = state.buffer.cursor();
    if state.buffer.move_cursor(dx, dy) {
        let after = state.buffer.cursor();
        tracing::trace!(target: "actions.dispatch", op = "motion", motion = ?kind, from_line = before.line, from_byte = before.byte, to_line = after.line, to_byte = after.byte, "motion");
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
