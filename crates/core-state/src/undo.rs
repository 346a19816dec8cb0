use std::collections::VecDeque;

use core_text::{Buffer, EditRecord};
use tracing::{trace, warn};

/// Default number of records retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 1000;

/// Bounded undo/redo stacks of reversible edit records.
///
/// Records are deltas produced by `Buffer` mutations. `undo` reverts the most
/// recent record and moves it to the redo stack; `redo` re-applies it and moves
/// it back. Recording a new edit clears redo. When the undo stack exceeds its
/// capacity the oldest record is dropped.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<EditRecord>,
    redo_stack: Vec<EditRecord>,
    cap: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_capacity(UNDO_HISTORY_MAX)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            cap: cap.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn record(&mut self, edit: EditRecord) {
        trace!(target: "state.undo", kind = edit.kind(), undo_depth = self.undo_stack.len() + 1, "push_record");
        self.undo_stack.push_back(edit);
        if self.undo_stack.len() > self.cap {
            self.undo_stack.pop_front();
            trace!(target: "state.undo", cap = self.cap, "undo_stack_trimmed");
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    /// Revert the most recent edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut Buffer) -> bool {
        let Some(last) = self.undo_stack.pop_back() else {
            return false;
        };
        trace!(target: "state.undo", kind = last.kind(), undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        if !buffer.revert(&last) {
            self.desync("undo");
            return false;
        }
        self.redo_stack.push(last);
        true
    }

    /// Re-apply the most recently undone edit. Returns false when there is nothing to redo.
    pub fn redo(&mut self, buffer: &mut Buffer) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        trace!(target: "state.undo", kind = next.kind(), undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo_pop");
        if !buffer.apply(&next) {
            self.desync("redo");
            return false;
        }
        self.undo_stack.push_back(next);
        true
    }

    /// Drop both stacks (full-document load / reload).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        trace!(target: "state.undo", "history_cleared");
    }

    // A record that no longer matches the document cannot be trusted, nor can
    // anything older than it.
    fn desync(&mut self, op: &'static str) {
        warn!(target: "state.undo", op, "history_desync_cleared");
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Position;

    #[test]
    fn undo_then_redo_round_trips_insert() {
        let mut buf = Buffer::from_text("t", "abc");
        let mut h = HistoryManager::new();
        h.record(buf.insert_char('x').unwrap());
        assert!(h.undo(&mut buf));
        assert_eq!(buf.line(0), Some("abc"));
        assert_eq!(buf.cursor(), Position::origin());
        assert!(h.redo(&mut buf));
        assert_eq!(buf.line(0), Some("xabc"));
        assert_eq!(buf.cursor(), Position::new(0, 1));
    }

    #[test]
    fn empty_stacks_are_noops() {
        let mut buf = Buffer::from_text("t", "abc");
        let mut h = HistoryManager::new();
        assert!(!h.undo(&mut buf));
        assert!(!h.redo(&mut buf));
        assert!(!buf.is_dirty());
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut buf = Buffer::from_text("t", "");
        let mut h = HistoryManager::new();
        h.record(buf.insert_char('a').unwrap());
        h.undo(&mut buf);
        assert_eq!(h.redo_depth(), 1);
        h.record(buf.insert_char('b').unwrap());
        assert_eq!(h.redo_depth(), 0);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut buf = Buffer::from_text("t", "");
        let mut h = HistoryManager::with_capacity(3);
        for ch in ['a', 'b', 'c', 'd'] {
            h.record(buf.insert_char(ch).unwrap());
        }
        assert_eq!(h.undo_depth(), 3);
        while h.undo(&mut buf) {}
        assert_eq!(buf.line(0), Some("a"), "oldest edit is no longer undoable");
    }

    #[test]
    fn mismatched_record_clears_history() {
        let mut buf = Buffer::from_text("t", "abc");
        let mut h = HistoryManager::new();
        h.record(buf.insert_char('x').unwrap());
        buf.load_document(vec!["zzz".into()]);
        assert!(!h.undo(&mut buf));
        assert_eq!(h.undo_depth(), 0);
        assert_eq!(buf.line(0), Some("zzz"));
    }
}
