//! Keyword completion: prefix filtering over static tables plus the popup
//! cursor (active flag and wrap-around selection index).
//!
//! The provider never touches a buffer. The caller extracts the prefix with
//! [`word_prefix`], asks for candidates, and records where the selected text
//! was placed via [`CompletionProvider::set_insertion`] so the next selection
//! step can replace it.

use tracing::trace;

pub mod keywords;

pub use keywords::Keyword;

/// Prefixes shorter than this (in bytes) never produce candidates.
pub const MIN_PREFIX_LEN: usize = 2;

/// Byte span within one row currently occupied by an applied candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct CompletionProvider {
    general: &'static [Keyword],
    candidates: Vec<Keyword>,
    index: usize,
    active: bool,
    insertion: Option<Insertion>,
}

impl Default for CompletionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionProvider {
    pub fn new() -> Self {
        Self::with_keywords(keywords::GENERAL)
    }

    /// Provider over a custom general table (extension tables still apply).
    pub fn with_keywords(general: &'static [Keyword]) -> Self {
        Self {
            general,
            candidates: Vec::new(),
            index: 0,
            active: false,
            insertion: None,
        }
    }

    /// Build a fresh candidate list for `prefix`. `ext` is the document's file
    /// extension without the dot. Order is general table order followed by the
    /// extension table; a keyword present in both appears once.
    pub fn request(&mut self, prefix: &str, ext: Option<&str>) -> &[Keyword] {
        self.candidates.clear();
        self.index = 0;
        self.insertion = None;
        if prefix.len() >= MIN_PREFIX_LEN {
            let extra = ext.map(keywords::for_extension).unwrap_or(&[]);
            for k in self.general.iter().chain(extra) {
                if k.text.starts_with(prefix) && !self.candidates.iter().any(|c| c.text == k.text) {
                    self.candidates.push(*k);
                }
            }
        }
        self.active = !self.candidates.is_empty();
        trace!(target: "complete", prefix, count = self.candidates.len(), "request");
        &self.candidates
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn candidates(&self) -> &[Keyword] {
        &self.candidates
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn selected(&self) -> Option<&Keyword> {
        if self.active {
            self.candidates.get(self.index)
        } else {
            None
        }
    }

    pub fn advance(&mut self) -> Option<&Keyword> {
        if self.active && !self.candidates.is_empty() {
            self.index = (self.index + 1) % self.candidates.len();
        }
        self.selected()
    }

    pub fn retreat(&mut self) -> Option<&Keyword> {
        if self.active && !self.candidates.is_empty() {
            self.index = self
                .index
                .checked_sub(1)
                .unwrap_or(self.candidates.len() - 1);
        }
        self.selected()
    }

    pub fn insertion(&self) -> Option<Insertion> {
        self.insertion
    }

    pub fn set_insertion(&mut self, insertion: Insertion) {
        self.insertion = Some(insertion);
    }

    /// Close the popup; candidates are dropped.
    pub fn dismiss(&mut self) {
        if self.active {
            trace!(target: "complete", "dismiss");
        }
        self.active = false;
        self.candidates.clear();
        self.index = 0;
        self.insertion = None;
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Run of word characters (`[A-Za-z0-9_]`) ending at `byte`; returns its
/// start offset and text.
pub fn word_prefix(line: &str, byte: usize) -> (usize, &str) {
    let end = byte.min(line.len());
    let bytes = line.as_bytes();
    let mut start = end;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    // word bytes are ASCII so both ends sit on char boundaries
    (start, line.get(start..end).unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    static FO_WORDS: &[Keyword] = &[
        Keyword {
            text: "for",
            description: "Loop",
        },
        Keyword {
            text: "format",
            description: "Format string",
        },
        Keyword {
            text: "if",
            description: "Conditional",
        },
    ];

    fn texts(p: &CompletionProvider) -> Vec<&'static str> {
        p.candidates().iter().map(|k| k.text).collect()
    }

    #[test]
    fn prefix_filters_in_order_and_wraps() {
        let mut p = CompletionProvider::with_keywords(FO_WORDS);
        p.request("fo", None);
        assert_eq!(texts(&p), vec!["for", "format"]);
        assert_eq!(p.selected().map(|k| k.text), Some("for"));
        assert_eq!(p.advance().map(|k| k.text), Some("format"));
        assert_eq!(p.advance().map(|k| k.text), Some("for"));
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn retreat_wraps_to_last() {
        let mut p = CompletionProvider::with_keywords(FO_WORDS);
        p.request("fo", None);
        assert_eq!(p.retreat().map(|k| k.text), Some("format"));
    }

    #[test]
    fn short_prefix_is_empty() {
        let mut p = CompletionProvider::new();
        assert!(p.request("f", None).is_empty());
        assert!(!p.is_active());
        assert!(p.advance().is_none());
    }

    #[test]
    fn extension_table_is_appended_without_duplicates() {
        let mut p = CompletionProvider::new();
        p.request("co", Some("js"));
        assert_eq!(texts(&p), vec!["continue", "const", "console.log"]);
        p.request("de", Some("go"));
        assert_eq!(texts(&p), vec!["defer"]);
        p.request("de", Some("rs"));
        assert!(texts(&p).is_empty());
    }

    #[test]
    fn request_resets_index() {
        let mut p = CompletionProvider::with_keywords(FO_WORDS);
        p.request("fo", None);
        p.advance();
        p.request("fo", None);
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn dismiss_clears_state() {
        let mut p = CompletionProvider::with_keywords(FO_WORDS);
        p.request("fo", None);
        p.set_insertion(Insertion {
            row: 0,
            start: 0,
            end: 3,
        });
        p.dismiss();
        assert!(!p.is_active());
        assert!(p.insertion().is_none());
        assert!(p.selected().is_none());
    }

    #[test]
    fn word_prefix_stops_at_non_word() {
        assert_eq!(word_prefix("let x = fo", 10), (8, "fo"));
        assert_eq!(word_prefix("a.b_c", 5), (2, "b_c"));
        assert_eq!(word_prefix("é", 2), (2, ""));
        assert_eq!(word_prefix("", 0), (0, ""));
    }
}
