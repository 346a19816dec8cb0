//! Key translation: `(Mode, KeyEvent)` -> `Action`.
//!
//! The match is exhaustive over `Mode` so adding a mode forces a decision for
//! every key class here. Unhandled keys translate to `None` (no-op). Ctrl
//! chords are reserved for the frontend (Ctrl-C exits) and never reach a mode
//! table.

use crate::{Action, CompletionStep, EditKind, ModeChange, MotionKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::Mode;

/// Translate a key for `mode`. `completion_active` reports whether the Insert
/// mode completion popup is open.
pub fn translate_key(mode: &Mode, completion_active: bool, key: &KeyEvent) -> Option<Action> {
    tracing::trace!(target: "actions.translate", mode = mode.label(), key = %key, completion_active, "translate_key_attempt");
    if key.mods.contains(KeyModifiers::CTRL) {
        return None;
    }
    if key.code == KeyCode::Esc {
        return match mode {
            Mode::Normal => None,
            Mode::Insert => Some(Action::ModeChange(ModeChange::LeaveInsert)),
            Mode::Command(_)
            | Mode::Search(_)
            | Mode::Filename { .. }
            | Mode::Rename { .. }
            | Mode::Confirm(_) => Some(Action::Cancel),
        };
    }
    match mode {
        Mode::Normal => normal(key),
        Mode::Insert => insert(key, completion_active),
        Mode::Command(_) | Mode::Search(_) | Mode::Filename { .. } | Mode::Rename { .. } => {
            prompt(key)
        }
        Mode::Confirm(_) => match key.code {
            KeyCode::Char('y' | 'Y') => Some(Action::Confirm(true)),
            KeyCode::Char('n' | 'N') => Some(Action::Confirm(false)),
            _ => None,
        },
    }
}

fn arrow(code: KeyCode) -> Option<Action> {
    let kind = match code {
        KeyCode::Left => MotionKind::Left,
        KeyCode::Right => MotionKind::Right,
        KeyCode::Up => MotionKind::Up,
        KeyCode::Down => MotionKind::Down,
        _ => return None,
    };
    Some(Action::Motion(kind))
}

fn normal(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char(c) => match c {
            'i' => Some(Action::ModeChange(ModeChange::EnterInsert)),
            ':' => Some(Action::ModeChange(ModeChange::EnterCommand)),
            '/' => Some(Action::ModeChange(ModeChange::EnterSearch)),
            'h' => Some(Action::Motion(MotionKind::Left)),
            'j' => Some(Action::Motion(MotionKind::Down)),
            'k' => Some(Action::Motion(MotionKind::Up)),
            'l' => Some(Action::Motion(MotionKind::Right)),
            'u' => Some(Action::Undo),
            'r' => Some(Action::Redo),
            'n' => Some(Action::SearchNext),
            'N' => Some(Action::SearchPrev),
            '?' => Some(Action::Help),
            _ => None,
        },
        other => arrow(other),
    }
}

fn insert(key: &KeyEvent, completion_active: bool) -> Option<Action> {
    if completion_active {
        match key.code {
            KeyCode::Tab | KeyCode::Down => return Some(Action::Complete(CompletionStep::Next)),
            KeyCode::Up => return Some(Action::Complete(CompletionStep::Previous)),
            _ => {}
        }
    }
    match key.code {
        KeyCode::Tab => Some(Action::Complete(CompletionStep::Request)),
        KeyCode::Enter => Some(Action::Edit(EditKind::Newline)),
        KeyCode::Backspace => Some(Action::Edit(EditKind::Backspace)),
        KeyCode::Char(_) => key
            .printable()
            .map(|c| Action::Edit(EditKind::InsertChar(c))),
        other => arrow(other),
    }
}

fn prompt(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::PromptSubmit),
        KeyCode::Backspace => Some(Action::PromptBackspace),
        KeyCode::Char(_) => key.printable().map(Action::PromptChar),
        _ => None,
    }
}
