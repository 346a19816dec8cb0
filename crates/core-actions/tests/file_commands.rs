mod common;
use common::*;

use core_actions::LoadLimits;
use core_events::KeyCode;
use core_state::{Mode, PendingAction};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn edit_line_zero(c: &mut core_actions::ModeController<MemFs>, ch: char) {
    c.handle_key(&key('i'));
    c.handle_key(&key(ch));
    press(c, KeyCode::Esc);
}

#[test]
fn write_saves_through_temp_and_rename() {
    let fs = MemFs::with_file("notes.txt", "old\n");
    let mut c = mk_controller_with("", fs);
    c.load_initial(Path::new("notes.txt"));
    edit_line_zero(&mut c, 'x');
    run_command(&mut c, "w");
    assert_eq!(status(&c), "File saved");
    assert_eq!(c.fs().get("notes.txt").as_deref(), Some("xold\n"));
    assert!(!c.fs().has("notes.txt.tmp"));
    assert!(!c.state().is_dirty());
}

#[test]
fn failed_rename_leaves_original_intact() {
    let fs = MemFs::with_file("notes.txt", "old\n");
    fs.fail_rename.set(true);
    let mut c = mk_controller_with("", fs);
    c.load_initial(Path::new("notes.txt"));
    edit_line_zero(&mut c, 'x');
    run_command(&mut c, "w");
    assert!(status(&c).starts_with("Error saving: rename failed"));
    assert_eq!(c.fs().get("notes.txt").as_deref(), Some("old\n"));
    assert!(!c.fs().has("notes.txt.tmp"));
    assert!(c.state().is_dirty());
}

#[test]
fn failed_write_quit_stays_open() {
    let fs = MemFs::with_file("notes.txt", "old\n");
    fs.fail_write.set(true);
    let mut c = mk_controller_with("", fs);
    c.load_initial(Path::new("notes.txt"));
    run_command(&mut c, "wq");
    assert!(!c.should_quit());
    assert_eq!(c.fs().get("notes.txt").as_deref(), Some("old\n"));
}

#[test]
fn existing_backup_blocks_save() {
    let fs = MemFs::with_file("notes.txt", "old\n");
    fs.put("notes.txt.bak", "backup");
    let mut c = mk_controller_with("", fs);
    c.load_initial(Path::new("notes.txt"));
    edit_line_zero(&mut c, 'x');
    run_command(&mut c, "w");
    assert_eq!(
        status(&c),
        "Error saving: backup file already exists: notes.txt.bak"
    );
    assert_eq!(c.fs().get("notes.txt").as_deref(), Some("old\n"));
}

#[test]
fn saveas_adopts_path() {
    let mut c = mk_controller("hello");
    run_command(&mut c, "saveas out.md");
    assert_eq!(status(&c), "File saved as out.md");
    assert_eq!(c.fs().get("out.md").as_deref(), Some("hello\n"));
    assert_eq!(c.state().file_name, Some(PathBuf::from("out.md")));
    assert_eq!(c.state().file_type(), "md");
}

#[test]
fn partial_load_refuses_same_path_write() {
    let body: String = (0..20).map(|i| format!("row {i}\n")).collect();
    let fs = MemFs::with_file("big.log", &body);
    let mut c = mk_controller_with("", fs).with_limits(LoadLimits {
        large_file_bytes: 16,
        initial_line_limit: 5,
    });
    c.load_initial(Path::new("big.log"));
    assert_eq!(c.state().buffer.line_count(), 5);
    assert_eq!(status(&c), "Large file: Only first 5 lines loaded");
    run_command(&mut c, "w");
    assert!(status(&c).starts_with("Error saving: only the first 5 lines"));
    assert_eq!(c.fs().get("big.log"), Some(body));
    run_command(&mut c, "saveas head.log");
    assert_eq!(c.fs().get("head.log").as_deref(), Some("row 0\nrow 1\nrow 2\nrow 3\nrow 4\n"));
}

#[test]
fn reload_refuses_dirty_unless_forced() {
    let fs = MemFs::with_file("a.txt", "disk\n");
    let mut c = mk_controller_with("", fs);
    c.load_initial(Path::new("a.txt"));
    edit_line_zero(&mut c, 'x');
    run_command(&mut c, "reload");
    assert_eq!(doc(&c), vec!["xdisk"]);
    run_command(&mut c, "reload!");
    assert_eq!(doc(&c), vec!["disk"]);
    assert_eq!(status(&c), "Reloaded: a.txt");
    assert_eq!(c.state().history.undo_depth(), 0);
}

#[test]
fn edit_opens_existing_or_new_path() {
    let fs = MemFs::with_file("b.txt", "bee\n");
    let mut c = mk_controller_with("", fs);
    run_command(&mut c, "e b.txt");
    assert_eq!(doc(&c), vec!["bee"]);
    run_command(&mut c, "e c.txt");
    assert_eq!(doc(&c), vec![""]);
    assert_eq!(status(&c), "New file: c.txt");
    assert!(!c.fs().has("c.txt"));
}

#[test]
fn search_term_survives_opening_another_file() {
    let fs = MemFs::with_file("b.txt", "zz one\n");
    let mut c = mk_controller_with("one", fs);
    c.handle_key(&key('/'));
    type_str(&mut c, "one");
    press(&mut c, KeyCode::Enter);
    run_command(&mut c, "e b.txt");
    assert_eq!(c.state().search.term(), "one");
    c.handle_key(&key('n'));
    assert_eq!(c.state().buffer.cursor(), core_text::Position::new(0, 3));
}

#[test]
fn info_reports_size_and_lines() {
    let fs = MemFs::with_file("a.txt", "one\ntwo\n");
    let mut c = mk_controller_with("", fs);
    run_command(&mut c, "info");
    assert_eq!(status(&c), "No file currently open");
    c.load_initial(Path::new("a.txt"));
    run_command(&mut c, "info");
    assert_eq!(status(&c), "File: a.txt | Size: 8 bytes | Lines: 2");
}

#[test]
fn staged_delete_answered_with_rm() {
    let fs = MemFs::with_file("junk.txt", "");
    let mut c = mk_controller_with("", fs);
    c.stage_delete("junk.txt");
    run_command(&mut c, "rm n");
    assert_eq!(status(&c), "Delete cancelled");
    assert!(c.fs().has("junk.txt"));
    c.stage_delete("junk.txt");
    run_command(&mut c, "rm y");
    assert_eq!(status(&c), "Deleted junk.txt");
    assert!(!c.fs().has("junk.txt"));
    run_command(&mut c, "rm maybe");
    assert_eq!(status(&c), "Invalid confirmation. Use 'rm y' or 'rm n'.");
}

#[test]
fn confirm_delete_via_keys() {
    let fs = MemFs::with_file("junk.txt", "");
    let mut c = mk_controller_with("", fs);
    c.request_delete("junk.txt");
    c.handle_key(&key('y'));
    assert_eq!(c.state().mode, Mode::Normal);
    assert!(!c.fs().has("junk.txt"));
}

#[test]
fn open_over_dirty_buffer_needs_confirmation() {
    let fs = MemFs::with_file("other.txt", "other\n");
    let mut c = mk_controller_with("mine", fs);
    edit_line_zero(&mut c, 'x');
    c.open_file("other.txt");
    assert_eq!(
        c.state().mode,
        Mode::Confirm(PendingAction::OpenFile(PathBuf::from("other.txt")))
    );
    c.handle_key(&key('n'));
    assert_eq!(doc(&c), vec!["xmine"]);
    c.open_file("other.txt");
    c.handle_key(&key('Y'));
    assert_eq!(doc(&c), vec!["other"]);
    assert!(!c.state().is_dirty());
}

#[test]
fn quit_blocked_while_dirty() {
    let mut c = mk_controller("a");
    edit_line_zero(&mut c, 'x');
    run_command(&mut c, "q");
    assert!(!c.should_quit());
    run_command(&mut c, "q!");
    assert!(c.should_quit());
}

#[test]
fn unknown_command_echoes_text() {
    let mut c = mk_controller("");
    run_command(&mut c, "frob 1");
    assert_eq!(status(&c), "Unknown command: frob 1");
    assert_eq!(c.state().mode, Mode::Normal);
}
