//! Mode transitions. Prompt modes start with empty text.

use super::DispatchResult;
use crate::ModeChange;
use core_state::{EditorState, LineInput, Mode};

pub(crate) fn handle_mode_change(mc: ModeChange, state: &mut EditorState) -> DispatchResult {
    let next = match mc {
        ModeChange::EnterInsert => Mode::Insert,
        ModeChange::LeaveInsert => {
            state.completion.dismiss();
            Mode::Normal
        }
        ModeChange::EnterCommand => Mode::Command(LineInput::new()),
        ModeChange::EnterSearch => Mode::Search(LineInput::new()),
    };
    state.set_mode(next);
    DispatchResult::dirty()
}
