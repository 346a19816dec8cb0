#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use core_actions::{FileOps, ModeController};
use core_events::{KeyCode, KeyEvent};
use core_state::EditorState;
use core_text::Buffer;

/// In-memory filesystem double. Individual operations can be made to fail.
#[derive(Default)]
pub struct MemFs {
    pub files: RefCell<BTreeMap<PathBuf, String>>,
    pub fail_rename: Cell<bool>,
    pub fail_write: Cell<bool>,
}

impl MemFs {
    pub fn with_file(path: &str, contents: &str) -> Self {
        let fs = Self::default();
        fs.put(path, contents);
        fs
    }

    pub fn put(&self, path: &str, contents: &str) {
        self.files
            .borrow_mut()
            .insert(PathBuf::from(path), contents.to_string());
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files.borrow().get(Path::new(path)).cloned()
    }

    pub fn has(&self, path: &str) -> bool {
        self.files.borrow().contains_key(Path::new(path))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
}

impl FileOps for MemFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        self.files
            .borrow()
            .get(path)
            .map(|s| s.len() as u64)
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.fail_write.get() {
            return Err(io::Error::other("disk full"));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.fail_rename.get() {
            return Err(io::Error::other("rename refused"));
        }
        let mut files = self.files.borrow_mut();
        let contents = files.remove(from).ok_or_else(|| not_found(from))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn create(&self, path: &Path) -> io::Result<()> {
        let mut files = self.files.borrow_mut();
        if files.contains_key(path) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "file exists"));
        }
        files.insert(path.to_path_buf(), String::new());
        Ok(())
    }
}

pub fn mk_controller(text: &str) -> ModeController<MemFs> {
    mk_controller_with(text, MemFs::default())
}

pub fn mk_controller_with(text: &str, fs: MemFs) -> ModeController<MemFs> {
    ModeController::new(EditorState::new(Buffer::from_text("t", text)), fs)
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::char(c)
}

pub fn press(c: &mut ModeController<MemFs>, code: KeyCode) {
    c.handle_key(&KeyEvent::plain(code));
}

/// Type each char of `s` as a separate key.
pub fn type_str(c: &mut ModeController<MemFs>, s: &str) {
    for ch in s.chars() {
        c.handle_key(&key(ch));
    }
}

/// Enter Command mode, type `cmd` and press Enter.
pub fn run_command(c: &mut ModeController<MemFs>, cmd: &str) {
    c.handle_key(&key(':'));
    type_str(c, cmd);
    press(c, KeyCode::Enter);
}

pub fn doc(c: &ModeController<MemFs>) -> Vec<String> {
    c.state().buffer.lines().to_vec()
}

pub fn status(c: &ModeController<MemFs>) -> String {
    c.state().status_text().unwrap_or_default().to_string()
}
