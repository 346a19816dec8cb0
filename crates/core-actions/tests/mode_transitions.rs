mod common;
use common::*;

use core_events::{KeyCode, KeyEvent};
use core_state::{LineInput, Mode, PendingAction};
use std::path::PathBuf;

#[test]
fn esc_mid_command_discards_text() {
    let mut c = mk_controller("abc");
    c.handle_key(&key(':'));
    type_str(&mut c, "line 1");
    assert_eq!(c.state().mode, Mode::Command(LineInput::from("line 1")));
    press(&mut c, KeyCode::Esc);
    assert_eq!(c.state().mode, Mode::Normal);
    c.handle_key(&key(':'));
    assert_eq!(c.state().mode.prompt().as_deref(), Some(":"));
}

#[test]
fn esc_from_search_keeps_previous_term() {
    let mut c = mk_controller("one two one");
    c.handle_key(&key('/'));
    type_str(&mut c, "one");
    press(&mut c, KeyCode::Enter);
    c.handle_key(&key('/'));
    type_str(&mut c, "two");
    press(&mut c, KeyCode::Esc);
    assert_eq!(c.state().search.term(), "one");
    c.handle_key(&key('n'));
    assert_eq!(c.state().buffer.cursor().byte, 8);
}

#[test]
fn normal_mode_keys_do_not_edit() {
    let mut c = mk_controller("abc");
    type_str(&mut c, "xyz");
    assert_eq!(doc(&c), vec!["abc"]);
    assert!(!c.state().is_dirty());
}

#[test]
fn motions_clamp_at_edges() {
    let mut c = mk_controller("ab\nc");
    type_str(&mut c, "hhkk");
    assert_eq!(c.state().buffer.cursor().line, 0);
    type_str(&mut c, "llll");
    assert_eq!(c.state().buffer.cursor().byte, 2);
    c.handle_key(&key('j'));
    assert_eq!(c.state().buffer.cursor().line, 1);
    assert_eq!(c.state().buffer.cursor().byte, 1);
    press(&mut c, KeyCode::Down);
    assert_eq!(c.state().buffer.cursor().line, 1);
}

#[test]
fn ctrl_chord_is_ignored_by_the_mode_machine() {
    let mut c = mk_controller("abc");
    c.handle_key(&key('i'));
    let res = c.handle_key(&KeyEvent::ctrl('c'));
    assert!(!res.dirty);
    assert_eq!(c.state().mode, Mode::Insert);
}

#[test]
fn confirm_ignores_other_keys_and_esc_cancels() {
    let mut c = mk_controller("");
    c.request_delete("a.txt");
    c.handle_key(&key('q'));
    assert_eq!(
        c.state().mode,
        Mode::Confirm(PendingAction::DeleteFile(PathBuf::from("a.txt")))
    );
    press(&mut c, KeyCode::Esc);
    assert_eq!(c.state().mode, Mode::Normal);
}

#[test]
fn rename_prompt_collects_name() {
    let fs = MemFs::with_file("dir/old.txt", "x\n");
    let mut c = mk_controller_with("", fs);
    c.begin_rename("dir/old.txt");
    type_str(&mut c, "new.txt");
    assert_eq!(c.state().mode.prompt().as_deref(), Some("New name: new.txt"));
    press(&mut c, KeyCode::Enter);
    assert_eq!(c.state().mode, Mode::Normal);
    assert!(c.fs().has("dir/new.txt"));
    assert!(!c.fs().has("dir/old.txt"));
    assert_eq!(status(&c), "Renamed to dir/new.txt");
}

#[test]
fn filename_prompt_creates_and_opens() {
    let mut c = mk_controller("");
    c.begin_create_file("proj");
    type_str(&mut c, "main.go");
    press(&mut c, KeyCode::Enter);
    assert!(c.fs().has("proj/main.go"));
    assert_eq!(
        c.state().file_name.as_deref(),
        Some(std::path::Path::new("proj/main.go"))
    );
    assert_eq!(status(&c), "Created new file: proj/main.go");
    assert_eq!(c.state().file_type(), "go");
}

#[test]
fn empty_filename_cancels() {
    let mut c = mk_controller("");
    c.begin_create_file("proj");
    press(&mut c, KeyCode::Enter);
    assert_eq!(status(&c), "Operation cancelled");
    assert!(c.fs().files.borrow().is_empty());
}

#[test]
fn click_then_type_inserts_at_clamped_column() {
    let mut c = mk_controller("ab\ncd");
    c.handle_key(&key('i'));
    c.click_at(1, 99);
    type_str(&mut c, "x");
    assert_eq!(doc(&c), vec!["ab", "cdx"]);
    assert_eq!(c.state().mode, Mode::Insert);
}
