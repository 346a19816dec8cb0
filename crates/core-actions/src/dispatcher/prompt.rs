//! Prompt-mode input: text editing, submit, cancel and confirm answers.

use super::{DispatchResult, command, files, search};
use crate::Action;
use crate::io_ops::{FileOps, IoContext};
use core_state::{EditorState, Mode};

pub(crate) fn handle_prompt_action<F: FileOps>(
    action: Action,
    state: &mut EditorState,
    io: &IoContext<F>,
) -> DispatchResult {
    match action {
        Action::PromptChar(ch) => match state.mode.input_mut() {
            Some(input) => {
                input.push_char(ch);
                DispatchResult::dirty()
            }
            None => DispatchResult::clean(),
        },
        Action::PromptBackspace => match state.mode.input_mut() {
            Some(input) => {
                input.backspace();
                DispatchResult::dirty()
            }
            None => DispatchResult::clean(),
        },
        Action::PromptSubmit => submit(state, io),
        Action::Cancel => {
            if state.mode == Mode::Normal {
                return DispatchResult::clean();
            }
            state.set_mode(Mode::Normal);
            DispatchResult::dirty()
        }
        Action::Confirm(yes) => {
            if !matches!(state.mode, Mode::Confirm(_)) {
                return DispatchResult::clean();
            }
            let Mode::Confirm(pending) = std::mem::take(&mut state.mode) else {
                return DispatchResult::clean();
            };
            tracing::trace!(target: "state.mode", from = "CONFIRM", to = "NORMAL", answer = yes, "mode_change");
            files::confirm(state, io, pending, yes)
        }
        _ => DispatchResult::clean(),
    }
}

/// Leave the prompt mode (its text moves out with the variant) and act on it.
fn submit<F: FileOps>(state: &mut EditorState, io: &IoContext<F>) -> DispatchResult {
    let taken = std::mem::take(&mut state.mode);
    tracing::trace!(target: "state.mode", from = taken.label(), to = "NORMAL", "prompt_submit");
    match taken {
        Mode::Command(input) => command::execute(input.as_str(), state, io),
        Mode::Search(input) => {
            if input.is_empty() {
                return DispatchResult::dirty();
            }
            search::run_find(state, input.as_str(), true)
        }
        Mode::Filename { dir, input } => files::create(state, io, &dir, input.as_str()),
        Mode::Rename { target, input } => files::rename(state, io, &target, input.as_str()),
        other @ (Mode::Normal | Mode::Insert | Mode::Confirm(_)) => {
            state.mode = other;
            DispatchResult::clean()
        }
    }
}
