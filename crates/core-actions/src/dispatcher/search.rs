//! Search submit and match stepping.

use super::DispatchResult;
use core_state::EditorState;

/// Run a search for `term`, report the count and, when `jump` is set, move the
/// cursor onto the first match.
pub(crate) fn run_find(state: &mut EditorState, term: &str, jump: bool) -> DispatchResult {
    let count = state.search.find(&state.buffer, term);
    if count == 0 {
        state.set_status("No matches found");
        return DispatchResult::dirty();
    }
    if jump && let Some(pos) = state.search.current() {
        state.buffer.set_cursor(pos);
    }
    state.set_status(format!("Found {count} matches"));
    DispatchResult::dirty()
}

pub(crate) fn handle_step(state: &mut EditorState, forward: bool) -> DispatchResult {
    let next = if forward {
        state.search.next()
    } else {
        state.search.previous()
    };
    let Some(pos) = next else {
        return DispatchResult::clean();
    };
    state.buffer.set_cursor(pos);
    let idx = state.search.current_index() + 1;
    let total = state.search.len();
    state.set_status(format!("Match {idx} of {total}"));
    tracing::trace!(target: "actions.dispatch", op = "search_step", forward, line = pos.line, byte = pos.byte, "search");
    DispatchResult::dirty()
}
