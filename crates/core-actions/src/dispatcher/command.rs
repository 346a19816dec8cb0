//! Command execution (`:w`, `:q`, `:line`, `:replace`, ...).
//!
//! Parsing lives in `command_parser`; this module applies a `ParsedCommand` to
//! editor state. User errors and IO failures are reported in the status line
//! and leave the document unchanged.

use std::path::{Path, PathBuf};

use super::command_parser::{CommandError, CommandParser, ParsedCommand, Setting};
use super::{DispatchResult, HELP_TEXT, files, search};
use crate::io_ops::{FileOps, IoContext};
use core_state::EditorState;
use core_text::Position;
use tracing::{error, info, warn};

pub(crate) fn execute<F: FileOps>(
    raw: &str,
    state: &mut EditorState,
    io: &IoContext<F>,
) -> DispatchResult {
    if raw.trim().is_empty() {
        return DispatchResult::dirty();
    }
    let cmd = match CommandParser::parse(raw) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!(target: "actions.command", raw, error = %e, "command_rejected");
            state.set_status(e.to_string());
            return DispatchResult::dirty();
        }
    };
    tracing::debug!(target: "actions.command", command = ?cmd, "execute");
    match cmd {
        ParsedCommand::Write => {
            write_to(state, io, None);
            DispatchResult::dirty()
        }
        ParsedCommand::SaveAs(path) => {
            if write_to(state, io, Some(&path)) {
                adopt_path(state, path);
            }
            DispatchResult::dirty()
        }
        ParsedCommand::Quit { force } => {
            if !force && state.is_dirty() {
                warn!(target: "actions.command", "quit_refused_dirty");
                state.set_status("Unsaved changes! Use :q! to force quit");
                return DispatchResult::dirty();
            }
            DispatchResult::quit()
        }
        ParsedCommand::WriteQuit => {
            if write_to(state, io, None) {
                DispatchResult::quit()
            } else {
                DispatchResult::dirty()
            }
        }
        ParsedCommand::Line(n) => goto_line(state, n),
        ParsedCommand::Find(term) => search::run_find(state, &term, false),
        ParsedCommand::Replace { old, new } => replace(state, &old, &new),
        ParsedCommand::Set(setting) => apply_setting(state, setting),
        ParsedCommand::Remove(yes) => remove(state, io, yes),
        ParsedCommand::Info => info_status(state, io),
        ParsedCommand::WordCount => {
            let s = state.buffer.stats();
            state.set_status(format!(
                "Lines: {} | Words: {} | Characters: {}",
                s.lines, s.words, s.chars
            ));
            DispatchResult::dirty()
        }
        ParsedCommand::Reload { force } => reload(state, io, force),
        ParsedCommand::Edit { path, force } => edit(state, io, path, force),
        ParsedCommand::Help => {
            state.set_status(HELP_TEXT);
            DispatchResult::dirty()
        }
    }
}

/// Save and report. Returns true on success.
fn write_to<F: FileOps>(state: &mut EditorState, io: &IoContext<F>, target: Option<&Path>) -> bool {
    match files::save(state, io, target) {
        Ok(path) => {
            let msg = match target {
                Some(_) => format!("File saved as {}", path.display()),
                None => "File saved".to_string(),
            };
            state.set_status(msg);
            true
        }
        Err(e) => {
            error!(target: "actions.command", error = %e, "save_failed");
            state.set_status(format!("Error saving: {e}"));
            false
        }
    }
}

fn adopt_path(state: &mut EditorState, path: PathBuf) {
    state.buffer.set_name(path.display().to_string());
    state.file_name = Some(path);
    // A full write to a new path makes the on-disk copy complete again.
    state.partial = None;
}

fn goto_line(state: &mut EditorState, n: usize) -> DispatchResult {
    if n == 0 || n > state.buffer.line_count() {
        state.set_status(CommandError::LineOutOfRange.to_string());
        return DispatchResult::dirty();
    }
    state.buffer.set_cursor(Position::new(n - 1, 0));
    state.set_status(format!("Moved to line {n}"));
    DispatchResult::dirty()
}

fn replace(state: &mut EditorState, old: &str, new: &str) -> DispatchResult {
    let outcome = match state.buffer.replace_all(old, new, state.group_replace) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(target: "actions.command", error = %e, "replace_refused");
            state.set_status(e.to_string());
            return DispatchResult::dirty();
        }
    };
    if outcome.occurrences == 0 {
        state.set_status("No matches found");
        return DispatchResult::dirty();
    }
    let records = outcome.records.len();
    for rec in outcome.records {
        state.commit(rec);
    }
    if records > 0 {
        state.search.refresh(&state.buffer);
    }
    info!(target: "actions.command", occurrences = outcome.occurrences, records, "replace");
    state.set_status(format!("Replaced {} occurrences", outcome.occurrences));
    DispatchResult::dirty()
}

fn apply_setting(state: &mut EditorState, setting: Setting) -> DispatchResult {
    let msg = match setting {
        Setting::TabSize(n) => {
            state.settings.tab_size = n;
            format!("Tab size set to {n}")
        }
        Setting::Syntax(on) => {
            state.settings.syntax = on;
            format!(
                "Syntax highlighting {}",
                if on { "enabled" } else { "disabled" }
            )
        }
        Setting::LineNumbers(on) => {
            state.settings.line_numbers = on;
            format!("Line numbers {}", if on { "enabled" } else { "disabled" })
        }
    };
    state.set_status(msg);
    DispatchResult::dirty()
}

fn remove<F: FileOps>(state: &mut EditorState, io: &IoContext<F>, yes: bool) -> DispatchResult {
    let Some(path) = state.pending_delete.take() else {
        state.set_status("No file staged for deletion");
        return DispatchResult::dirty();
    };
    if yes {
        files::delete(state, io, &path)
    } else {
        state.set_status("Delete cancelled");
        DispatchResult::dirty()
    }
}

fn info_status<F: FileOps>(state: &mut EditorState, io: &IoContext<F>) -> DispatchResult {
    let Some(path) = state.file_name.clone() else {
        state.set_status("No file currently open");
        return DispatchResult::dirty();
    };
    match io.fs.file_len(&path) {
        Ok(bytes) => {
            let lines = state.buffer.line_count();
            state.set_status(format!(
                "File: {} | Size: {bytes} bytes | Lines: {lines}",
                path.display()
            ));
        }
        Err(e) => {
            warn!(target: "io", path = %path.display(), error = %e, "stat_failed");
            state.set_status("Could not retrieve file information");
        }
    }
    DispatchResult::dirty()
}

fn reload<F: FileOps>(state: &mut EditorState, io: &IoContext<F>, force: bool) -> DispatchResult {
    let Some(path) = state.file_name.clone() else {
        state.set_status("No file to reload");
        return DispatchResult::dirty();
    };
    if state.is_dirty() && !force {
        state.set_status("Unsaved changes! Use :reload! to discard them");
        return DispatchResult::dirty();
    }
    match files::load_into(state, io, &path) {
        Ok(()) => {
            if state.partial.is_none() {
                state.set_status(format!("Reloaded: {}", path.display()));
            }
            DispatchResult::buffer_replaced()
        }
        Err(e) => {
            error!(target: "io", path = %path.display(), error = %e, "reload_failed");
            state.set_status(format!("Error reloading: {e}"));
            DispatchResult::dirty()
        }
    }
}

fn edit<F: FileOps>(
    state: &mut EditorState,
    io: &IoContext<F>,
    path: PathBuf,
    force: bool,
) -> DispatchResult {
    if state.is_dirty() && !force {
        state.set_status("Unsaved changes! Use :e! <path> to discard them");
        return DispatchResult::dirty();
    }
    if !io.fs.exists(&path) {
        info!(target: "io", path = %path.display(), "edit_new_file");
        state.set_status(format!("New file: {}", path.display()));
        state.load_document(Vec::new(), Some(path));
        return DispatchResult::buffer_replaced();
    }
    files::open_now(state, io, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_ops::LocalFs;
    use core_text::Buffer;

    fn mk_state(text: &str) -> EditorState {
        EditorState::new(Buffer::from_text("t", text))
    }

    fn run(st: &mut EditorState, raw: &str) -> DispatchResult {
        execute(raw, st, &IoContext::new(LocalFs))
    }

    #[test]
    fn line_out_of_range_keeps_cursor() {
        let mut st = mk_state("a\nb\nc\nd\ne");
        run(&mut st, "line 3");
        assert_eq!(st.buffer.cursor(), Position::new(2, 0));
        run(&mut st, "line 9");
        assert_eq!(st.buffer.cursor(), Position::new(2, 0));
        assert_eq!(st.status_text(), Some("Line number out of range"));
        run(&mut st, "line 0");
        assert_eq!(st.buffer.cursor(), Position::new(2, 0));
    }

    #[test]
    fn quit_refused_when_dirty() {
        let mut st = mk_state("a");
        let rec = st.buffer.insert_char('x').unwrap();
        st.commit(rec);
        assert!(!run(&mut st, "q").quit);
        assert_eq!(
            st.status_text(),
            Some("Unsaved changes! Use :q! to force quit")
        );
        assert!(run(&mut st, "q!").quit);
    }

    #[test]
    fn write_without_name_reports_error() {
        let mut st = mk_state("a");
        run(&mut st, "w");
        assert_eq!(
            st.status_text(),
            Some("Error saving: no filename specified")
        );
        assert!(!run(&mut st, "wq").quit);
    }

    #[test]
    fn set_commands_update_settings() {
        let mut st = mk_state("");
        run(&mut st, "set tabsize 2");
        assert_eq!(st.settings.tab_size, 2);
        run(&mut st, "set syntax off");
        assert!(!st.settings.syntax);
        assert_eq!(st.status_text(), Some("Syntax highlighting disabled"));
        run(&mut st, "set nonumber");
        assert!(!st.settings.line_numbers);
    }

    #[test]
    fn word_count_reports_stats() {
        let mut st = mk_state("foo bar\nbaz");
        run(&mut st, "wc");
        assert_eq!(
            st.status_text(),
            Some("Lines: 2 | Words: 3 | Characters: 10")
        );
    }

    #[test]
    fn rm_without_staged_file() {
        let mut st = mk_state("");
        run(&mut st, "rm y");
        assert_eq!(st.status_text(), Some("No file staged for deletion"));
    }

    #[test]
    fn find_reports_without_moving() {
        let mut st = mk_state("ab ab\nab");
        st.buffer.set_cursor(Position::new(1, 1));
        run(&mut st, "find ab");
        assert_eq!(st.status_text(), Some("Found 3 matches"));
        assert_eq!(st.buffer.cursor(), Position::new(1, 1));
    }

    #[test]
    fn empty_command_is_a_no_op() {
        let mut st = mk_state("a");
        run(&mut st, "   ");
        assert!(st.status_text().is_none());
    }
}
