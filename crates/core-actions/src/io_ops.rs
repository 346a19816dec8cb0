//! File IO seam used by the dispatcher.
//!
//! All filesystem access goes through `FileOps` so the command layer can be
//! exercised with in-memory doubles. `LocalFs` is the std-backed implementation.
//! Document load applies the large-file policy; save is two-phase (temp sibling
//! then rename) and never leaves a partially written target behind.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use core_text::split_lines;
use thiserror::Error;
use tracing::{debug, error};

pub trait FileOps {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    /// First `max_lines` lines of the file (newline and `\r` stripped).
    fn read_head(&self, path: &Path, max_lines: usize) -> io::Result<Vec<String>> {
        let content = self.read_to_string(path)?;
        Ok(split_lines(&content).into_iter().take(max_lines).collect())
    }
    fn file_len(&self, path: &Path) -> io::Result<u64>;
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove(&self, path: &Path) -> io::Result<()>;
    fn exists(&self, path: &Path) -> bool;
    /// Create an empty file; fails if it already exists.
    fn create(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileOps for LocalFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn read_head(&self, path: &Path, max_lines: usize) -> io::Result<Vec<String>> {
        let reader = BufReader::new(fs::File::open(path)?);
        reader
            .lines()
            .take(max_lines)
            .map(|l| {
                l.map(|mut s| {
                    if s.ends_with('\r') {
                        s.pop();
                    }
                    s
                })
            })
            .collect()
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create(&self, path: &Path) -> io::Result<()> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map(|_| ())
    }
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("no filename specified")]
    NoFilename,
    #[error("backup file already exists: {}", .0.display())]
    BackupExists(PathBuf),
    #[error("only the first {lines} lines are loaded; use :saveas <path>")]
    PartialLoad { lines: usize },
    #[error("{op} failed for {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        FileError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Large-file policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLimits {
    /// Files above this size load only `initial_line_limit` lines.
    pub large_file_bytes: u64,
    pub initial_line_limit: usize,
}

impl Default for LoadLimits {
    fn default() -> Self {
        Self {
            large_file_bytes: 50 * 1024 * 1024,
            initial_line_limit: 1000,
        }
    }
}

/// Filesystem collaborator plus the policy applied to it.
#[derive(Debug, Clone, Default)]
pub struct IoContext<F> {
    pub fs: F,
    pub limits: LoadLimits,
}

impl<F: FileOps> IoContext<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            limits: LoadLimits::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub lines: Vec<String>,
    pub bytes: u64,
    /// `Some(n)` if only the first `n` lines were read.
    pub truncated: Option<usize>,
}

/// Read `path` into document lines, honoring the large-file policy.
pub fn open_document<F: FileOps>(
    fs: &F,
    path: &Path,
    limits: LoadLimits,
) -> Result<LoadedDocument, FileError> {
    let bytes = fs
        .file_len(path)
        .map_err(|e| FileError::io("stat", path, e))?;
    if bytes > limits.large_file_bytes {
        let mut lines = fs
            .read_head(path, limits.initial_line_limit.saturating_add(1))
            .map_err(|e| FileError::io("read", path, e))?;
        let truncated = if lines.len() > limits.initial_line_limit {
            lines.truncate(limits.initial_line_limit);
            Some(lines.len())
        } else {
            None
        };
        debug!(target: "io", path = %path.display(), bytes, lines = lines.len(), truncated = truncated.is_some(), "open_large");
        return Ok(LoadedDocument {
            lines,
            bytes,
            truncated,
        });
    }
    let content = fs
        .read_to_string(path)
        .map_err(|e| FileError::io("read", path, e))?;
    let lines = split_lines(&content);
    debug!(target: "io", path = %path.display(), bytes, lines = lines.len(), "open");
    Ok(LoadedDocument {
        lines,
        bytes,
        truncated: None,
    })
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

pub fn temp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

pub fn backup_path(path: &Path) -> PathBuf {
    sibling(path, ".bak")
}

/// Write `contents` to `path` atomically: full write to `<path>.tmp`, then
/// rename over the target. Refuses when `<path>.bak` exists. On failure the
/// temp file is removed and the target is untouched.
pub fn save_document<F: FileOps>(fs: &F, path: &Path, contents: &str) -> Result<(), FileError> {
    let bak = backup_path(path);
    if fs.exists(&bak) {
        error!(target: "io", path = %path.display(), "save_refused_backup_exists");
        return Err(FileError::BackupExists(bak));
    }
    let tmp = temp_path(path);
    if let Err(e) = fs.write(&tmp, contents) {
        let _ = fs.remove(&tmp);
        error!(target: "io", path = %tmp.display(), error = %e, "temp_write_failed");
        return Err(FileError::io("write", &tmp, e));
    }
    if let Err(e) = fs.rename(&tmp, path) {
        let _ = fs.remove(&tmp);
        error!(target: "io", path = %path.display(), error = %e, "rename_failed");
        return Err(FileError::io("rename", path, e));
    }
    debug!(target: "io", path = %path.display(), bytes = contents.len(), "saved");
    Ok(())
}
