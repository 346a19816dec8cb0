//! Config -> editor wiring.

use std::path::Path;
use std::time::Duration;

use core_actions::{LoadLimits, LocalFs, ModeController};
use core_config::ConfigFile;
use core_state::{EditorState, HistoryManager, Settings};
use core_text::Buffer;

pub const UNNAMED_BUFFER: &str = "[No Name]";

pub fn build_state(cfg: &ConfigFile) -> EditorState {
    let buffer = Buffer::new(UNNAMED_BUFFER).with_max_line_len(cfg.editor.max_line_length);
    let mut state = EditorState::new(buffer);
    state.history = HistoryManager::with_capacity(cfg.history.capacity);
    state.settings = Settings {
        tab_size: cfg.editor.tab_size,
        syntax: cfg.editor.syntax,
        line_numbers: cfg.editor.line_numbers,
    };
    state.group_replace = cfg.history.group_replace;
    state.completion_enabled = cfg.editor.completion;
    state.status_ttl = Duration::from_millis(cfg.ui.status_timeout_ms);
    state
}

pub fn load_limits(cfg: &ConfigFile) -> LoadLimits {
    LoadLimits {
        large_file_bytes: cfg.files.large_file_bytes,
        initial_line_limit: cfg.files.initial_line_limit,
    }
}

/// Controller over the local filesystem, with `path` loaded when given.
pub fn build_controller(cfg: &ConfigFile, path: Option<&Path>) -> ModeController<LocalFs> {
    let mut controller =
        ModeController::new(build_state(cfg), LocalFs).with_limits(load_limits(cfg));
    if let Some(p) = path {
        controller.load_initial(p);
    }
    controller
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::parse;

    #[test]
    fn config_values_reach_state() {
        let cfg = parse(
            "[editor]\ntab_size = 2\nline_numbers = false\ncompletion = false\nmax_line_length = 8\n[history]\ncapacity = 3\ngroup_replace = true\n[ui]\nstatus_timeout_ms = 500\n",
        )
        .unwrap();
        let st = build_state(&cfg);
        assert_eq!(st.settings.tab_size, 2);
        assert!(!st.settings.line_numbers);
        assert!(!st.completion_enabled);
        assert!(st.group_replace);
        assert_eq!(st.history.capacity(), 3);
        assert_eq!(st.buffer.max_line_len(), 8);
        assert_eq!(st.status_ttl, Duration::from_millis(500));
    }

    #[test]
    fn controller_opens_startup_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hi\nthere\n").unwrap();
        let c = build_controller(&ConfigFile::default(), Some(&path));
        assert_eq!(c.state().buffer.line_count(), 2);
        assert_eq!(c.state().file_type(), "txt");
        assert_eq!(c.limits(), load_limits(&ConfigFile::default()));
    }

    #[test]
    fn controller_without_path_is_unnamed() {
        let c = build_controller(&ConfigFile::default(), None);
        assert_eq!(c.state().buffer.name(), UNNAMED_BUFFER);
        assert_eq!(c.state().file_type(), "New File");
    }
}
