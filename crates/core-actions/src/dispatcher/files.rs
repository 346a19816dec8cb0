//! Document load/save and file-tree requests (create, rename, delete).
//!
//! IO failures never propagate: each request reports its outcome through the
//! status line and leaves the open document untouched on error.

use std::path::{Path, PathBuf};

use super::DispatchResult;
use crate::io_ops::{FileError, FileOps, IoContext, open_document, save_document};
use core_state::{EditorState, Mode, PartialLoad, PendingAction};
use tracing::{info, warn};

/// Replace the document with the contents of `path`.
pub(crate) fn load_into<F: FileOps>(
    state: &mut EditorState,
    io: &IoContext<F>,
    path: &Path,
) -> Result<(), FileError> {
    let doc = open_document(&io.fs, path, io.limits)?;
    state.load_document(doc.lines, Some(path.to_path_buf()));
    if let Some(lines_loaded) = doc.truncated {
        state.partial = Some(PartialLoad {
            path: path.to_path_buf(),
            lines_loaded,
        });
        warn!(target: "io", path = %path.display(), lines_loaded, "partial_load");
        state.set_status(format!(
            "Large file: Only first {lines_loaded} lines loaded"
        ));
    } else {
        state.set_status(format!("Opened {}", path.display()));
    }
    info!(target: "io", path = %path.display(), "document_loaded");
    Ok(())
}

/// Open `path` unconditionally, reporting failure in the status line.
pub(crate) fn open_now<F: FileOps>(
    state: &mut EditorState,
    io: &IoContext<F>,
    path: &Path,
) -> DispatchResult {
    match load_into(state, io, path) {
        Ok(()) => DispatchResult::buffer_replaced(),
        Err(e) => {
            warn!(target: "io", path = %path.display(), error = %e, "open_failed");
            state.set_status(format!("Error opening file: {e}"));
            DispatchResult::dirty()
        }
    }
}

/// Open `path`, asking first when unsaved changes would be lost.
pub(crate) fn open<F: FileOps>(
    state: &mut EditorState,
    io: &IoContext<F>,
    path: PathBuf,
) -> DispatchResult {
    if state.is_dirty() {
        state.set_mode(Mode::Confirm(PendingAction::OpenFile(path)));
        return DispatchResult::dirty();
    }
    open_now(state, io, &path)
}

/// Write the document to `target` (or the current file) and mark it clean.
pub(crate) fn save<F: FileOps>(
    state: &mut EditorState,
    io: &IoContext<F>,
    target: Option<&Path>,
) -> Result<PathBuf, FileError> {
    let path = match target.or(state.file_name.as_deref()) {
        Some(p) => p.to_path_buf(),
        None => return Err(FileError::NoFilename),
    };
    if let Some(partial) = &state.partial
        && partial.path == path
    {
        return Err(FileError::PartialLoad {
            lines: partial.lines_loaded,
        });
    }
    save_document(&io.fs, &path, &state.buffer.to_text())?;
    state.buffer.mark_clean();
    info!(target: "io", path = %path.display(), lines = state.buffer.line_count(), "document_saved");
    Ok(path)
}

/// Create `dir/name` as an empty file, then open it.
pub(crate) fn create<F: FileOps>(
    state: &mut EditorState,
    io: &IoContext<F>,
    dir: &Path,
    name: &str,
) -> DispatchResult {
    let name = name.trim();
    if name.is_empty() {
        state.set_status("Operation cancelled");
        return DispatchResult::dirty();
    }
    let path = dir.join(name);
    if let Err(e) = io.fs.create(&path) {
        warn!(target: "io", path = %path.display(), error = %e, "create_failed");
        state.set_status(format!("Error creating file: {e}"));
        return DispatchResult::dirty();
    }
    info!(target: "io", path = %path.display(), "file_created");
    let res = open(state, io, path.clone());
    if !matches!(state.mode, Mode::Confirm(_)) {
        state.set_status(format!("Created new file: {}", path.display()));
    }
    res
}

/// Rename `target` to a sibling called `name`.
pub(crate) fn rename<F: FileOps>(
    state: &mut EditorState,
    io: &IoContext<F>,
    target: &Path,
    name: &str,
) -> DispatchResult {
    let name = name.trim();
    if name.is_empty() {
        state.set_status("Operation cancelled");
        return DispatchResult::dirty();
    }
    let dest = match target.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    };
    if let Err(e) = io.fs.rename(target, &dest) {
        warn!(target: "io", from = %target.display(), to = %dest.display(), error = %e, "rename_failed");
        state.set_status(format!("Error renaming file: {e}"));
        return DispatchResult::dirty();
    }
    if state.file_name.as_deref() == Some(target) {
        state.buffer.set_name(dest.display().to_string());
        state.file_name = Some(dest.clone());
    }
    info!(target: "io", from = %target.display(), to = %dest.display(), "file_renamed");
    state.set_status(format!("Renamed to {}", dest.display()));
    DispatchResult::dirty()
}

pub(crate) fn delete<F: FileOps>(
    state: &mut EditorState,
    io: &IoContext<F>,
    path: &Path,
) -> DispatchResult {
    match io.fs.remove(path) {
        Ok(()) => {
            info!(target: "io", path = %path.display(), "file_deleted");
            state.set_status(format!("Deleted {}", path.display()));
        }
        Err(e) => {
            warn!(target: "io", path = %path.display(), error = %e, "delete_failed");
            state.set_status(format!("Error deleting file: {e}"));
        }
    }
    DispatchResult::dirty()
}

/// Resolve a Confirm-mode answer. The caller has already left Confirm mode.
pub(crate) fn confirm<F: FileOps>(
    state: &mut EditorState,
    io: &IoContext<F>,
    action: PendingAction,
    yes: bool,
) -> DispatchResult {
    match (action, yes) {
        (PendingAction::DeleteFile(path), true) => delete(state, io, &path),
        (PendingAction::DeleteFile(_), false) => {
            state.set_status("Delete cancelled");
            DispatchResult::dirty()
        }
        (PendingAction::OpenFile(path), true) => open_now(state, io, &path),
        (PendingAction::OpenFile(_), false) => {
            state.set_status("Operation cancelled");
            DispatchResult::dirty()
        }
    }
}
