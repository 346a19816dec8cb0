//! Configuration loading and parsing.
//!
//! Parses `oxed.toml` (or an override path provided by the binary). Every
//! field is optional; absent sections fall back to built-in defaults and
//! unknown fields are ignored so older binaries tolerate newer files.
//!
//! A missing file is not an error. A file that fails to parse is logged at
//! warn and replaced by defaults. Out-of-range values (zero tab size, zero
//! history capacity, ...) are clamped by `Config::sanitize`, which logs each
//! adjustment under the `config` target.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "oxed.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    pub tab_size: usize,
    pub line_numbers: bool,
    pub syntax: bool,
    pub completion: bool,
    pub max_line_length: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            line_numbers: true,
            syntax: true,
            completion: true,
            max_line_length: 10_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    /// Record `:replace` as a single undo step instead of one per line.
    pub group_replace: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            group_replace: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FilesConfig {
    /// Files larger than this load only `initial_line_limit` lines.
    pub large_file_bytes: u64,
    pub initial_line_limit: usize,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            large_file_bytes: 50 * 1024 * 1024,
            initial_line_limit: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    pub status_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub source: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxed").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    let mut cfg = match parse(&content) {
        Ok(file) => Config {
            raw: Some(content),
            source: Some(path),
            file,
        },
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            return Ok(Config::default());
        }
    };
    cfg.sanitize();
    Ok(cfg)
}

/// Parse TOML text into the file schema.
pub fn parse(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str::<ConfigFile>(content)?)
}

impl Config {
    /// Clamp out-of-range values to usable ones. Returns the number of fields adjusted.
    pub fn sanitize(&mut self) -> usize {
        let defaults = ConfigFile::default();
        let mut adjusted = 0;
        let editor = &mut self.file.editor;
        if editor.tab_size == 0 {
            info!(target: "config", raw = 0, clamped = defaults.editor.tab_size, "tab_size_clamped");
            editor.tab_size = defaults.editor.tab_size;
            adjusted += 1;
        }
        if editor.max_line_length == 0 {
            info!(target: "config", raw = 0, clamped = defaults.editor.max_line_length, "max_line_length_clamped");
            editor.max_line_length = defaults.editor.max_line_length;
            adjusted += 1;
        }
        if self.file.history.capacity == 0 {
            info!(target: "config", raw = 0, clamped = 1, "history_capacity_clamped");
            self.file.history.capacity = 1;
            adjusted += 1;
        }
        if self.file.files.initial_line_limit == 0 {
            info!(target: "config", raw = 0, clamped = defaults.files.initial_line_limit, "initial_line_limit_clamped");
            self.file.files.initial_line_limit = defaults.files.initial_line_limit;
            adjusted += 1;
        }
        adjusted
    }
}
