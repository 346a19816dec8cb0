//! Actions: the modal input state machine.
//!
//! Keys flow through three layers:
//! 1. `key_translator` maps `(Mode, KeyEvent)` to an `Action` (pure, exhaustive over modes).
//! 2. `dispatcher` applies the `Action` to `EditorState`, calling into the
//!    buffer, history, search and completion components or the `FileOps` collaborator.
//! 3. `ModeController` owns the state and the collaborator and exposes the
//!    entry points used by the event loop and the file tree.

pub mod controller;
pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;

pub use controller::ModeController;
pub use dispatcher::command_parser::{CommandError, CommandParser, ParsedCommand, Setting};
pub use dispatcher::{DispatchResult, dispatch};
pub use io_ops::{FileError, FileOps, IoContext, LoadLimits, LocalFs};
pub use key_translator::translate_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    EnterInsert,
    LeaveInsert,
    EnterCommand,
    EnterSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    Newline,
    /// Delete before the cursor, joining with the previous line at column 0.
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStep {
    /// Compute candidates for the prefix under the cursor and apply the first.
    Request,
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    ModeChange(ModeChange),
    Edit(EditKind),
    Undo,
    Redo,
    SearchNext,
    SearchPrev,
    Complete(CompletionStep),
    /// Append to the active prompt's text.
    PromptChar(char),
    PromptBackspace,
    /// Enter in a prompt mode (Command, Search, Filename, Rename).
    PromptSubmit,
    /// Esc from a prompt or Confirm mode.
    Cancel,
    /// Answer in Confirm mode.
    Confirm(bool),
    Help,
}

impl Action {
    /// Actions that keep an active completion popup open.
    pub fn keeps_completion(&self) -> bool {
        matches!(
            self,
            Action::Complete(CompletionStep::Next | CompletionStep::Previous)
        )
    }
}
