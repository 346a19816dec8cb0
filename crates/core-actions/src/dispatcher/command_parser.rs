//! Structured command line parsing.
//!
//! Converts the raw command text (without the leading ':') into a
//! `ParsedCommand`. Pure classification with no side effects; argument
//! validation that needs no document state (numbers, on/off flags) happens
//! here and surfaces as `CommandError`, whose `Display` is the status message.
//! Range checks against the document happen at execution.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    TabSize(usize),
    Syntax(bool),
    LineNumbers(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Write,
    SaveAs(PathBuf),
    Quit { force: bool },
    WriteQuit,
    /// 1-based target line.
    Line(usize),
    Find(String),
    Replace { old: String, new: String },
    Set(Setting),
    /// Answer to a staged delete.
    Remove(bool),
    Info,
    WordCount,
    Reload { force: bool },
    Edit { path: PathBuf, force: bool },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid line number")]
    InvalidLineNumber,
    #[error("Line number out of range")]
    LineOutOfRange,
    #[error("Invalid tab size")]
    InvalidTabSize,
    #[error("Invalid confirmation. Use 'rm y' or 'rm n'.")]
    InvalidConfirmation,
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),
    #[error("Unknown command: {0}")]
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> Result<ParsedCommand, CommandError> {
        let body = raw.trim();
        let body = body.strip_prefix(':').unwrap_or(body).trim_start();
        let (verb, rest) = match body.split_once(char::is_whitespace) {
            Some((v, r)) => (v, r.trim()),
            None => (body, ""),
        };
        let cmd = match verb {
            "w" if rest.is_empty() => ParsedCommand::Write,
            "w" | "saveas" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("saveas <filename>"));
                }
                ParsedCommand::SaveAs(PathBuf::from(rest))
            }
            "q" => ParsedCommand::Quit { force: false },
            "q!" => ParsedCommand::Quit { force: true },
            "wq" => ParsedCommand::WriteQuit,
            "line" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("line <number>"));
                }
                let n = rest
                    .parse::<usize>()
                    .map_err(|_| CommandError::InvalidLineNumber)?;
                ParsedCommand::Line(n)
            }
            "find" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("find <search term>"));
                }
                ParsedCommand::Find(rest.to_string())
            }
            "replace" => {
                let Some((old, new)) = rest.split_once(char::is_whitespace) else {
                    return Err(CommandError::Usage("replace <old> <new>"));
                };
                let new = new.trim_start();
                if old.is_empty() || new.is_empty() {
                    return Err(CommandError::Usage("replace <old> <new>"));
                }
                ParsedCommand::Replace {
                    old: old.to_string(),
                    new: new.to_string(),
                }
            }
            "set" => ParsedCommand::Set(parse_setting(rest)?),
            "rm" => match rest {
                "y" => ParsedCommand::Remove(true),
                "n" => ParsedCommand::Remove(false),
                "" => return Err(CommandError::Usage("rm y|n")),
                _ => return Err(CommandError::InvalidConfirmation),
            },
            "info" => ParsedCommand::Info,
            "wc" => ParsedCommand::WordCount,
            "reload" => ParsedCommand::Reload { force: false },
            "reload!" => ParsedCommand::Reload { force: true },
            "e" | "e!" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("e <path>"));
                }
                ParsedCommand::Edit {
                    path: PathBuf::from(rest),
                    force: verb == "e!",
                }
            }
            "help" => ParsedCommand::Help,
            _ => return Err(CommandError::Unknown(body.to_string())),
        };
        Ok(cmd)
    }
}

fn parse_setting(rest: &str) -> Result<Setting, CommandError> {
    let (name, value) = match rest.split_once(char::is_whitespace) {
        Some((n, v)) => (n, v.trim()),
        None => (rest, ""),
    };
    match name {
        "tabsize" => {
            if value.is_empty() {
                return Err(CommandError::Usage("set tabsize <number>"));
            }
            match value.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Setting::TabSize(n)),
                _ => Err(CommandError::InvalidTabSize),
            }
        }
        "syntax" => match value {
            "on" => Ok(Setting::Syntax(true)),
            "off" => Ok(Setting::Syntax(false)),
            _ => Err(CommandError::Usage("set syntax on|off")),
        },
        "number" => Ok(Setting::LineNumbers(true)),
        "nonumber" => Ok(Setting::LineNumbers(false)),
        "" => Err(CommandError::Usage(
            "set tabsize <n> | syntax on|off | number | nonumber",
        )),
        other => Err(CommandError::UnknownSetting(other.to_string())),
    }
}
