//! crossterm event -> `InputEvent` mapping.
//!
//! Only key presses and repeats are forwarded (release events are dropped
//! where the terminal reports them). Ctrl-C becomes `InputEvent::CtrlC` so the
//! event loop can exit without consulting the mode machine. Left-button
//! presses become `InputEvent::Click` with raw screen coordinates.

use std::time::Duration;

use anyhow::Result;
use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    self, Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKind,
    KeyModifiers as CMods, MouseButton, MouseEvent, MouseEventKind,
};

fn map_code(code: &CKeyCode) -> Option<KeyCode> {
    let mapped = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        _ => return None,
    };
    Some(mapped)
}

fn map_mods(mods: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

fn map_key(key: &CKeyEvent) -> Option<InputEvent> {
    if key.kind == CKind::Release {
        return None;
    }
    let code = map_code(&key.code)?;
    let mods = map_mods(key.modifiers);
    if mods.contains(KeyModifiers::CTRL) && matches!(code, KeyCode::Char('c' | 'C')) {
        return Some(InputEvent::CtrlC);
    }
    Some(InputEvent::Key(KeyEvent::new(code, mods)))
}

// Only left-button presses; drags, scrolls and releases are dropped.
fn map_mouse(mouse: &MouseEvent) -> Option<InputEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click {
            col: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}

/// Convert one crossterm event. Unsupported events map to `None`.
pub fn convert_event(ev: &CEvent) -> Option<InputEvent> {
    match ev {
        CEvent::Key(key) => map_key(key),
        CEvent::Mouse(mouse) => map_mouse(mouse),
        CEvent::Resize(w, h) => Some(InputEvent::Resize(*w, *h)),
        _ => None,
    }
}

/// Wait up to `timeout` for the next supported event.
pub fn poll_event(timeout: Duration) -> Result<Option<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let ev = event::read()?;
    let converted = convert_event(&ev);
    if converted.is_none() {
        tracing::trace!(target: "input.event", event = ?ev, "event_ignored");
    }
    Ok(converted)
}
