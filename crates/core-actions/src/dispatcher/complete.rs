//! Keyword completion in Insert mode.
//!
//! `Request` replaces the typed prefix with the first candidate. While the
//! popup stays open, `Next` / `Previous` swap the previously applied candidate
//! for the newly selected one. Each application is one `ReplaceLine` record.

use super::DispatchResult;
use crate::CompletionStep;
use core_complete::{Insertion, word_prefix};
use core_state::{EditorState, Mode};
use core_text::Position;

pub(crate) fn handle_completion(step: CompletionStep, state: &mut EditorState) -> DispatchResult {
    if !matches!(state.mode, Mode::Insert) || !state.completion_enabled {
        return DispatchResult::clean();
    }
    match step {
        CompletionStep::Request => request(state),
        CompletionStep::Next => {
            if state.completion.advance().is_none() {
                return DispatchResult::clean();
            }
            apply_selected(state)
        }
        CompletionStep::Previous => {
            if state.completion.retreat().is_none() {
                return DispatchResult::clean();
            }
            apply_selected(state)
        }
    }
}

fn request(state: &mut EditorState) -> DispatchResult {
    let cursor = state.buffer.cursor();
    let line = state.buffer.line(cursor.line).unwrap_or("");
    let (start, prefix) = word_prefix(line, cursor.byte);
    let prefix = prefix.to_string();
    let ext = state.file_extension().map(str::to_string);
    let count = state.completion.request(&prefix, ext.as_deref()).len();
    if count == 0 {
        return DispatchResult::clean();
    }
    state.completion.set_insertion(Insertion {
        row: cursor.line,
        start,
        end: cursor.byte,
    });
    apply_selected(state)
}

fn apply_selected(state: &mut EditorState) -> DispatchResult {
    let (Some(keyword), Some(span)) = (
        state.completion.selected().copied(),
        state.completion.insertion(),
    ) else {
        return DispatchResult::clean();
    };
    let current = state
        .buffer
        .line(span.row)
        .and_then(|l| l.get(span.start..span.end));
    if current == Some(keyword.text) {
        // a fully typed keyword needs no edit
        state
            .buffer
            .set_cursor(Position::new(span.row, span.end));
    } else {
        match state
            .buffer
            .replace_range(span.row, span.start, span.end, keyword.text)
        {
            Ok(Some(record)) => state.commit(record),
            Ok(None) => {
                state.completion.dismiss();
                return DispatchResult::clean();
            }
            Err(e) => {
                tracing::warn!(target: "actions.dispatch", op = "complete", error = %e, "edit_refused");
                state.completion.dismiss();
                state.set_status(e.to_string());
                return DispatchResult::dirty();
            }
        }
    }
    state.completion.set_insertion(Insertion {
        row: span.row,
        start: span.start,
        end: span.start + keyword.text.len(),
    });
    tracing::trace!(target: "actions.dispatch", op = "complete", candidate = keyword.text, index = state.completion.index(), "complete");
    state.set_status(format!("Completed: {}", keyword.text));
    DispatchResult::dirty()
}
