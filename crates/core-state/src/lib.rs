//! Editor state: the single owned context object the dispatcher mutates.
//!
//! `EditorState` bundles the document (`Buffer`), its edit history, the search
//! and completion state, the active `Mode` and status-line metadata. There is
//! no global state; the controller owns one `EditorState` and renderers borrow
//! it read-only between events.
//!
//! Mode transient state:
//! - Each prompt mode carries its own text inside the `Mode` variant, so a
//!   transition away from it (Enter, Esc) drops that text with the variant.
//! - The committed search term is the exception: it lives in `SearchIndex`
//!   and survives leaving Search mode so `n`/`N` keep working.
//!
//! Undo granularity is one record per mutating keypress. `commit` is the single
//! entry point that moves a fresh `EditRecord` into history.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use core_complete::CompletionProvider;
use core_text::{Buffer, EditRecord};
use tracing::trace;

pub mod search;
pub mod undo;

pub use search::SearchIndex;
pub use undo::{HistoryManager, UNDO_HISTORY_MAX};

/// Default lifetime of a status message.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Growing single-line input used by prompt modes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineInput {
    buf: String,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn as_str(&self) -> &str {
        &self.buf
    }
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
    pub fn push_char(&mut self, ch: char) {
        self.buf.push(ch);
    }
    /// Remove the last char; no-op when empty.
    pub fn backspace(&mut self) {
        self.buf.pop();
    }
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl From<&str> for LineInput {
    fn from(s: &str) -> Self {
        Self { buf: s.to_string() }
    }
}

/// Action awaiting a y/n answer in Confirm mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteFile(PathBuf),
    /// Open that would discard unsaved changes.
    OpenFile(PathBuf),
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            PendingAction::DeleteFile(p) => format!("Delete {}? (y/n)", p.display()),
            PendingAction::OpenFile(p) => {
                format!("Discard unsaved changes and open {}? (y/n)", p.display())
            }
        }
    }
}

/// Current editor mode. Exactly one is active; prompt variants own their text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Command(LineInput),
    Search(LineInput),
    /// New file name being typed, to be created inside `dir`.
    Filename { dir: PathBuf, input: LineInput },
    /// New name for `target` being typed.
    Rename { target: PathBuf, input: LineInput },
    Confirm(PendingAction),
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command(_) => "COMMAND",
            Mode::Search(_) => "SEARCH",
            Mode::Filename { .. } => "FILENAME",
            Mode::Rename { .. } => "RENAME",
            Mode::Confirm(_) => "CONFIRM",
        }
    }

    /// Prompt line shown while the mode collects input, if any.
    pub fn prompt(&self) -> Option<String> {
        match self {
            Mode::Normal | Mode::Insert => None,
            Mode::Command(input) => Some(format!(":{}", input.as_str())),
            Mode::Search(input) => Some(format!("/{}", input.as_str())),
            Mode::Filename { input, .. } => Some(format!("New file name: {}", input.as_str())),
            Mode::Rename { input, .. } => Some(format!("New name: {}", input.as_str())),
            Mode::Confirm(action) => Some(action.prompt()),
        }
    }

    /// Text input of the active prompt mode.
    pub fn input_mut(&mut self) -> Option<&mut LineInput> {
        match self {
            Mode::Command(input)
            | Mode::Search(input)
            | Mode::Filename { input, .. }
            | Mode::Rename { input, .. } => Some(input),
            Mode::Normal | Mode::Insert | Mode::Confirm(_) => None,
        }
    }
}

/// User-adjustable presentation settings (`:set`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub tab_size: usize,
    pub syntax: bool,
    pub line_numbers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tab_size: 4,
            syntax: true,
            line_numbers: true,
        }
    }
}

/// Set when a large file was truncated on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialLoad {
    pub path: PathBuf,
    pub lines_loaded: usize,
}

/// Ephemeral status message container.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// Top-level editor state container (single buffer).
pub struct EditorState {
    pub buffer: Buffer,
    pub history: HistoryManager,
    pub search: SearchIndex,
    pub completion: CompletionProvider,
    pub mode: Mode,
    pub file_name: Option<PathBuf>,
    pub settings: Settings,
    pub ephemeral_status: Option<EphemeralMessage>,
    pub status_ttl: Duration,
    /// Delete staged by the file tree, answered with `:rm y|n`.
    pub pending_delete: Option<PathBuf>,
    pub partial: Option<PartialLoad>,
    /// Record `:replace` as one grouped undo step.
    pub group_replace: bool,
    pub completion_enabled: bool,
    pub quit_requested: bool,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            history: HistoryManager::new(),
            search: SearchIndex::new(),
            completion: CompletionProvider::new(),
            mode: Mode::Normal,
            file_name: None,
            settings: Settings::default(),
            ephemeral_status: None,
            status_ttl: STATUS_TIMEOUT,
            pending_delete: None,
            partial: None,
            group_replace: false,
            completion_enabled: true,
            quit_requested: false,
        }
    }

    /// Set an ephemeral status message with a fixed timeout duration.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Status message using the configured lifetime.
    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        let ttl = self.status_ttl;
        self.set_ephemeral(msg, ttl);
    }

    /// Tick ephemeral status; returns true if message expired and was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        if let Some(m) = &self.ephemeral_status
            && Instant::now() >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }

    pub fn status_text(&self) -> Option<&str> {
        self.ephemeral_status.as_ref().map(|m| m.text.as_str())
    }

    /// Switch modes; the previous mode's transient state is dropped.
    pub fn set_mode(&mut self, mode: Mode) {
        if std::mem::discriminant(&self.mode) != std::mem::discriminant(&mode) {
            trace!(target: "state.mode", from = self.mode.label(), to = mode.label(), "mode_change");
        }
        self.mode = mode;
    }

    /// Push a fresh edit into history.
    pub fn commit(&mut self, record: EditRecord) {
        self.history.record(record);
    }

    pub fn undo(&mut self) -> bool {
        self.completion.dismiss();
        self.history.undo(&mut self.buffer)
    }

    pub fn redo(&mut self) -> bool {
        self.completion.dismiss();
        self.history.redo(&mut self.buffer)
    }

    /// Replace the document wholesale (open / reload). History is cleared and
    /// the kept search term is re-run against the new text.
    pub fn load_document(&mut self, lines: Vec<String>, path: Option<PathBuf>) {
        self.buffer.load_document(lines);
        if let Some(p) = &path {
            self.buffer.set_name(p.display().to_string());
        }
        self.file_name = path;
        self.history.clear();
        self.search.refresh(&self.buffer);
        self.completion.dismiss();
        self.partial = None;
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// Extension of the current file without the leading dot.
    pub fn file_extension(&self) -> Option<&str> {
        self.file_name
            .as_deref()
            .and_then(Path::extension)
            .and_then(|e| e.to_str())
    }

    /// Short file type shown in the status line.
    pub fn file_type(&self) -> &str {
        match (&self.file_name, self.file_extension()) {
            (None, _) => "New File",
            (Some(_), None) => "Text",
            (Some(_), Some(ext)) => ext,
        }
    }
}
