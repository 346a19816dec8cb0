//! Literal text search over the document.

use core_text::{Buffer, Position};
use tracing::debug;

/// Last committed search term with its ordered match list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    term: String,
    matches: Vec<Position>,
    current: usize,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every line for case-sensitive, non-overlapping occurrences of
    /// `term`. Replaces any previous result; the selection resets to the first
    /// match. Returns the match count.
    pub fn find(&mut self, buffer: &Buffer, term: &str) -> usize {
        self.term = term.to_string();
        self.matches.clear();
        self.current = 0;
        if !term.is_empty() {
            for (row, line) in buffer.lines().iter().enumerate() {
                self.matches
                    .extend(line.match_indices(term).map(|(col, _)| Position::new(row, col)));
            }
        }
        debug!(target: "state.search", term, matches = self.matches.len(), "find");
        self.matches.len()
    }

    pub fn next(&mut self) -> Option<Position> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.matches.len();
        self.current()
    }

    pub fn previous(&mut self) -> Option<Position> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.matches.len() - 1);
        self.current()
    }

    pub fn current(&self) -> Option<Position> {
        self.matches.get(self.current).copied()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches(&self) -> &[Position] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Re-scan `buffer` for the kept term after the document changed under
    /// it, so `n`/`N` keep working. Selection resets to the first match.
    pub fn refresh(&mut self, buffer: &Buffer) -> usize {
        if self.term.is_empty() {
            return 0;
        }
        let term = std::mem::take(&mut self.term);
        self.find(buffer, &term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_ordered_and_non_overlapping() {
        let buf = Buffer::from_text("t", "aaaa\nxa\n");
        let mut s = SearchIndex::new();
        assert_eq!(s.find(&buf, "aa"), 2);
        assert_eq!(
            s.matches(),
            &[Position::new(0, 0), Position::new(0, 2)]
        );
        assert_eq!(s.find(&buf, "a"), 5);
        assert_eq!(s.matches()[4], Position::new(1, 1));
    }

    #[test]
    fn next_wraps_back_to_start() {
        let buf = Buffer::from_text("t", "ab ab\nab");
        let mut s = SearchIndex::new();
        let k = s.find(&buf, "ab");
        assert_eq!(k, 3);
        for _ in 0..k {
            s.next();
        }
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.previous(), Some(Position::new(1, 0)));
    }

    #[test]
    fn empty_term_and_no_match_are_noops() {
        let buf = Buffer::from_text("t", "abc");
        let mut s = SearchIndex::new();
        assert_eq!(s.find(&buf, ""), 0);
        assert_eq!(s.next(), None);
        assert_eq!(s.find(&buf, "zz"), 0);
        assert_eq!(s.previous(), None);
        assert_eq!(s.term(), "zz");
    }

    #[test]
    fn refresh_rescans_kept_term() {
        let mut s = SearchIndex::new();
        s.find(&Buffer::from_text("t", "one two one"), "one");
        s.next();
        let replaced = Buffer::from_text("t", "zz one");
        assert_eq!(s.refresh(&replaced), 1);
        assert_eq!(s.term(), "one");
        assert_eq!(s.current(), Some(Position::new(0, 3)));
        let mut empty = SearchIndex::new();
        assert_eq!(empty.refresh(&replaced), 0);
    }

    #[test]
    fn search_is_case_sensitive() {
        let buf = Buffer::from_text("t", "Foo foo");
        let mut s = SearchIndex::new();
        assert_eq!(s.find(&buf, "foo"), 1);
        assert_eq!(s.current(), Some(Position::new(0, 4)));
    }
}
