//! Dispatcher applying `Action` to mutable editor state.
//!
//! Sub-modules:
//! * `motion`   - cursor movement
//! * `mode`     - mode transitions (Normal <-> Insert / prompt entry)
//! * `edit`     - text mutation (insert/backspace/newline)
//! * `undo`     - undo / redo dispatch
//! * `complete` - keyword completion popup
//! * `search`   - search submit and `n`/`N`
//! * `prompt`   - prompt text editing, submit, cancel and confirm answers
//! * `command`  - `:` command execution
//! * `files`    - open / save / create / rename / delete requests
//!
//! Every handler leaves the buffer and cursor valid. User and IO errors become
//! status messages; nothing here panics or returns an error to the caller.

use crate::Action;
use crate::io_ops::{FileOps, IoContext};
use core_state::EditorState;

pub(crate) mod command;
pub mod command_parser;
mod complete;
mod edit;
pub(crate) mod files;
mod mode;
mod motion;
mod prompt;
mod search;
mod undo;

pub(crate) const HELP_TEXT: &str = "i insert | : command | / search | n/N next/prev | u/r undo/redo | :w :q :wq :saveas :line :find :replace :set :info :wc :reload :e";

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// The document was replaced wholesale (open / reload) or its line
    /// count changed by replay; renderers should reset scroll state.
    pub buffer_replaced: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            buffer_replaced: false,
        }
    }
    pub fn buffer_replaced() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: true,
        }
    }
}

/// Apply an action to editor state. Returns `DispatchResult` describing whether
/// a render is needed (`dirty`) or the editor should exit (`quit`).
pub fn dispatch<F: FileOps>(
    action: Action,
    state: &mut EditorState,
    io: &IoContext<F>,
) -> DispatchResult {
    tracing::trace!(target: "actions.dispatch", action = ?action, mode = state.mode.label(), "dispatch");
    let mut dismissed = false;
    if state.completion.is_active() && !action.keeps_completion() {
        state.completion.dismiss();
        dismissed = true;
    }
    let mut result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, state),
        Action::ModeChange(mc) => mode::handle_mode_change(mc, state),
        Action::Edit(kind) => edit::handle_edit(kind, state),
        Action::Undo => undo::handle_undo(state),
        Action::Redo => undo::handle_redo(state),
        Action::SearchNext => search::handle_step(state, true),
        Action::SearchPrev => search::handle_step(state, false),
        Action::Complete(step) => complete::handle_completion(step, state),
        Action::PromptChar(_)
        | Action::PromptBackspace
        | Action::PromptSubmit
        | Action::Cancel
        | Action::Confirm(_) => prompt::handle_prompt_action(action, state, io),
        Action::Help => {
            state.set_status(HELP_TEXT);
            DispatchResult::dirty()
        }
    };
    if dismissed {
        result.dirty = true;
    }
    if result.quit {
        state.quit_requested = true;
    }
    result
}
