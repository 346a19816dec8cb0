//! `ModeController`: the owned context driving one editing session.
//!
//! Holds the `EditorState` and the filesystem collaborator. The event loop
//! feeds keys through `handle_key`; the file-tree side uses the request entry
//! points (open, create, rename, delete), which route through the same mode
//! machine so confirmations and prompts behave identically.

use std::path::{Path, PathBuf};

use crate::dispatcher::{self, DispatchResult, files};
use crate::io_ops::{FileOps, IoContext, LoadLimits, LocalFs};
use crate::translate_key;
use core_events::KeyEvent;
use core_state::{EditorState, LineInput, Mode, PendingAction};
use core_text::Position;

pub struct ModeController<F: FileOps = LocalFs> {
    state: EditorState,
    io: IoContext<F>,
}

impl<F: FileOps> ModeController<F> {
    pub fn new(state: EditorState, fs: F) -> Self {
        Self {
            state,
            io: IoContext::new(fs),
        }
    }

    pub fn with_limits(mut self, limits: LoadLimits) -> Self {
        self.io.limits = limits;
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn fs(&self) -> &F {
        &self.io.fs
    }

    pub fn limits(&self) -> LoadLimits {
        self.io.limits
    }

    /// Translate and apply one key. Unmapped keys are no-ops.
    pub fn handle_key(&mut self, key: &KeyEvent) -> DispatchResult {
        match translate_key(&self.state.mode, self.state.completion.is_active(), key) {
            Some(action) => dispatcher::dispatch(action, &mut self.state, &self.io),
            None => DispatchResult::clean(),
        }
    }

    /// Place the cursor at a clicked document position, clamped to the text.
    /// Only Normal and Insert mode react; prompts and confirmations keep focus.
    pub fn click_at(&mut self, line: usize, byte: usize) -> DispatchResult {
        if !matches!(self.state.mode, Mode::Normal | Mode::Insert) {
            return DispatchResult::clean();
        }
        self.state.completion.dismiss();
        self.state.buffer.set_cursor(Position::new(line, byte));
        let after = self.state.buffer.cursor();
        tracing::trace!(target: "actions.dispatch", op = "click", line, byte, to_line = after.line, to_byte = after.byte, "click");
        DispatchResult::dirty()
    }

    pub fn should_quit(&self) -> bool {
        self.state.quit_requested
    }

    /// Open `path`; asks for confirmation first when the buffer is dirty.
    pub fn open_file(&mut self, path: impl Into<PathBuf>) -> DispatchResult {
        files::open(&mut self.state, &self.io, path.into())
    }

    /// Startup load: an existing file is opened, a missing one starts an empty
    /// document bound to that path.
    pub fn load_initial(&mut self, path: &Path) -> DispatchResult {
        if self.io.fs.exists(path) {
            return files::open_now(&mut self.state, &self.io, path);
        }
        tracing::info!(target: "io", path = %path.display(), "new_file");
        self.state.load_document(Vec::new(), Some(path.to_path_buf()));
        self.state.set_status(format!("New file: {}", path.display()));
        DispatchResult::buffer_replaced()
    }

    /// Prompt for a new file name inside `dir`.
    pub fn begin_create_file(&mut self, dir: impl Into<PathBuf>) -> DispatchResult {
        self.state.set_mode(Mode::Filename {
            dir: dir.into(),
            input: LineInput::new(),
        });
        DispatchResult::dirty()
    }

    /// Prompt for a new name for `target`.
    pub fn begin_rename(&mut self, target: impl Into<PathBuf>) -> DispatchResult {
        self.state.set_mode(Mode::Rename {
            target: target.into(),
            input: LineInput::new(),
        });
        DispatchResult::dirty()
    }

    /// Ask y/n before deleting `path`.
    pub fn request_delete(&mut self, path: impl Into<PathBuf>) -> DispatchResult {
        self.state
            .set_mode(Mode::Confirm(PendingAction::DeleteFile(path.into())));
        DispatchResult::dirty()
    }

    /// Stage `path` for deletion, answered later with `:rm y|n`.
    pub fn stage_delete(&mut self, path: impl Into<PathBuf>) -> DispatchResult {
        let path = path.into();
        tracing::debug!(target: "io", path = %path.display(), "delete_staged");
        self.state.pending_delete = Some(path);
        self.state.set_status("Confirm delete? (rm y/n)");
        DispatchResult::dirty()
    }
}
