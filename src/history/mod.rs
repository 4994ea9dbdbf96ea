//! Snapshot history for undo/redo
//!
//! Every undoable action replaces the whole serialized document, so the
//! history stores complete prior documents rather than reversible commands.
//! Undo and redo are a swap between the current document and the top of the
//! corresponding stack.

use crate::models::SerializedDocument;
use std::collections::VecDeque;

/// Default number of undo steps kept per session
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// One past document plus the name of the action that left it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub document: SerializedDocument,
    /// e.g. "Add Day", shown as "Undo Add Day"
    pub label: Option<String>,
}

impl HistoryEntry {
    pub fn new(document: SerializedDocument, label: Option<String>) -> Self {
        Self { document, label }
    }
}

/// Undo/redo stacks of document snapshots
#[derive(Clone, Debug)]
pub struct HistoryStack {
    /// Oldest entry at the front; the front is dropped when full
    undo: VecDeque<HistoryEntry>,
    /// Top of the stack is the last element
    redo: Vec<HistoryEntry>,
    max_size: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl PartialEq for HistoryStack {
    fn eq(&self, other: &Self) -> bool {
        self.undo == other.undo && self.redo == other.redo
    }
}

impl HistoryStack {
    /// Create a history keeping at most `max_size` undo steps (minimum 1)
    pub fn new(max_size: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record the document as it was before a successful mutation
    ///
    /// A new action invalidates everything that could have been redone.
    pub fn record(&mut self, previous: SerializedDocument, label: Option<String>) {
        self.redo.clear();
        self.undo.push_back(HistoryEntry::new(previous, label));

        if self.undo.len() > self.max_size {
            self.undo.pop_front();
            log::debug!("History limit {} reached, dropped oldest undo step", self.max_size);
        }
    }

    /// Step back one action
    ///
    /// # Parameters
    /// * `current` - the document being left; it becomes the redo target
    ///
    /// # Returns
    /// The document to restore, or `None` when there is nothing to undo
    pub fn undo(&mut self, current: SerializedDocument) -> Option<SerializedDocument> {
        let entry = self.undo.pop_back()?;
        self.redo.push(HistoryEntry::new(current, entry.label));
        Some(entry.document)
    }

    /// Step forward one undone action; `None` when there is nothing to redo
    pub fn redo(&mut self, current: SerializedDocument) -> Option<SerializedDocument> {
        let entry = self.redo.pop()?;
        self.undo.push_back(HistoryEntry::new(current, entry.label));
        if self.undo.len() > self.max_size {
            self.undo.pop_front();
        }
        Some(entry.document)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().and_then(|entry| entry.label.as_deref())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().and_then(|entry| entry.label.as_deref())
    }

    /// Menu text for undo: "Undo Add Day", or plain "Undo" without a label
    pub fn undo_title(&self) -> String {
        menu_title("Undo", self.undo_label())
    }

    pub fn redo_title(&self) -> String {
        menu_title("Redo", self.redo_label())
    }

    /// Iterate undo snapshots from oldest to newest
    pub fn undo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.undo.iter()
    }

    /// Iterate redo snapshots from bottom to top
    pub fn redo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.redo.iter()
    }

    /// Forget all history (a different document was opened or created)
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn menu_title(verb: &str, label: Option<&str>) -> String {
    match label {
        Some(label) if !label.is_empty() => format!("{} {}", verb, label),
        _ => verb.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> SerializedDocument {
        SerializedDocument::from(text)
    }

    fn documents(entries: impl Iterator<Item = HistoryEntry>) -> Vec<String> {
        entries.map(|e| e.document.as_str().to_string()).collect()
    }

    fn undo_docs(stack: &HistoryStack) -> Vec<String> {
        documents(stack.undo_entries().cloned())
    }

    fn redo_docs(stack: &HistoryStack) -> Vec<String> {
        documents(stack.redo_entries().cloned())
    }

    #[test]
    fn test_empty_history_is_a_no_op() {
        let mut stack = HistoryStack::default();
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert_eq!(stack.undo(doc("D0")), None);
        assert_eq!(stack.redo(doc("D0")), None);
        assert_eq!(stack.undo_count(), 0);
        assert_eq!(stack.redo_count(), 0);
    }

    #[test]
    fn test_undo_redo_scenario() {
        let mut stack = HistoryStack::default();

        stack.record(doc("D0"), Some("Add Day".into()));
        stack.record(doc("D1"), Some("Add Segment".into()));
        assert_eq!(undo_docs(&stack), vec!["D0", "D1"]);

        let restored = stack.undo(doc("D2")).unwrap();
        assert_eq!(restored.as_str(), "D1");
        assert_eq!(undo_docs(&stack), vec!["D0"]);
        assert_eq!(redo_docs(&stack), vec!["D2"]);

        let restored = stack.undo(restored).unwrap();
        assert_eq!(restored.as_str(), "D0");
        assert!(!stack.can_undo());
        assert_eq!(redo_docs(&stack), vec!["D2", "D1"]);

        let restored = stack.redo(restored).unwrap();
        assert_eq!(restored.as_str(), "D1");
        assert_eq!(undo_docs(&stack), vec!["D0"]);
        assert_eq!(redo_docs(&stack), vec!["D2"]);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut stack = HistoryStack::default();
        stack.record(doc("D0"), None);
        let current = stack.undo(doc("D1")).unwrap();
        assert!(stack.can_redo());

        stack.record(current, None);
        assert!(!stack.can_redo());
        assert_eq!(stack.redo(doc("D3")), None);
    }

    #[test]
    fn test_labels_follow_the_entry() {
        let mut stack = HistoryStack::default();
        assert_eq!(stack.undo_title(), "Undo");

        stack.record(doc("D0"), Some("Add Day".into()));
        assert_eq!(stack.undo_label(), Some("Add Day"));
        assert_eq!(stack.undo_title(), "Undo Add Day");

        let current = stack.undo(doc("D1")).unwrap();
        assert_eq!(stack.redo_title(), "Redo Add Day");
        assert_eq!(stack.undo_title(), "Undo");

        stack.redo(current).unwrap();
        assert_eq!(stack.undo_title(), "Undo Add Day");
        assert_eq!(stack.redo_title(), "Redo");
    }

    #[test]
    fn test_max_size_enforcement() {
        let mut stack = HistoryStack::new(3);
        for i in 0..5 {
            stack.record(doc(&format!("D{}", i)), None);
        }
        assert_eq!(stack.undo_count(), 3);
        assert_eq!(undo_docs(&stack), vec!["D2", "D3", "D4"]);
    }

    #[test]
    fn test_zero_limit_keeps_one_step() {
        let mut stack = HistoryStack::new(0);
        stack.record(doc("D0"), None);
        stack.record(doc("D1"), None);
        assert_eq!(stack.max_size(), 1);
        assert_eq!(undo_docs(&stack), vec!["D1"]);
    }

    #[test]
    fn test_clear() {
        let mut stack = HistoryStack::default();
        stack.record(doc("D0"), None);
        stack.record(doc("D1"), None);
        stack.undo(doc("D2"));
        stack.clear();
        assert_eq!(stack, HistoryStack::default());
    }
}
