//! Document state store
//!
//! Holds the one current document of an editing session together with the
//! annotations that live outside it: selection/focus, file path and the
//! modified flag. Structural questions about the document ("how many days")
//! go through the engine's outline query and are cached until the next
//! [`DocumentStore::replace`].

pub mod selection;

pub use selection::{FocusMode, SegmentRef, Selection};

use crate::gateway::{CallGateway, GatewayError};
use crate::models::{DocumentOutline, SerializedDocument};
use once_cell::unsync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct DocumentStore {
    gateway: Arc<CallGateway>,
    current: SerializedDocument,
    outline: OnceCell<DocumentOutline>,
    selection: Selection,
    file_path: Option<PathBuf>,
    modified: bool,
}

impl DocumentStore {
    /// Create a store holding `document`
    pub fn new(gateway: Arc<CallGateway>, document: SerializedDocument) -> Self {
        Self {
            gateway,
            current: document,
            outline: OnceCell::new(),
            selection: Selection::default(),
            file_path: None,
            modified: false,
        }
    }

    pub fn current(&self) -> &SerializedDocument {
        &self.current
    }

    /// Adopt a new document and return the one it replaces
    ///
    /// The outline cache is dropped and the selection is re-checked against
    /// the new document. If the outline cannot be fetched the selection is
    /// cleared, since none of its indices can be trusted.
    pub fn replace(&mut self, document: SerializedDocument) -> SerializedDocument {
        let previous = std::mem::replace(&mut self.current, document);
        self.outline = OnceCell::new();

        match self.outline().map(DocumentOutline::clone) {
            Ok(outline) => self.selection.revalidate(&outline),
            Err(e) => {
                log::warn!("Could not refresh outline, clearing selection: {}", e);
                self.selection.clear();
            }
        }

        previous
    }

    /// Structural summary of the current document (cached)
    pub fn outline(&self) -> Result<&DocumentOutline, GatewayError> {
        self.outline
            .get_or_try_init(|| self.gateway.outline(&self.current))
    }

    pub fn day_count(&self) -> Result<usize, GatewayError> {
        Ok(self.outline()?.day_count())
    }

    /// Segment count of `day`; `None` when the day does not exist
    pub fn segment_count(&self, day: usize) -> Result<Option<usize>, GatewayError> {
        Ok(self.outline()?.segment_count(day))
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: Option<PathBuf>) {
        self.file_path = path;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn gateway(&self) -> &Arc<CallGateway> {
        &self.gateway
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("current", &self.current)
            .field("selection", &self.selection)
            .field("file_path", &self.file_path)
            .field("modified", &self.modified)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> DocumentStore {
        let gateway = Arc::new(CallGateway::linked());
        let doc = gateway.new_document().unwrap();
        DocumentStore::new(gateway, doc)
    }

    fn with_day_and_segments(store: &mut DocumentStore, segments: usize) {
        let gateway = store.gateway().clone();
        let mut doc = gateway.add_day(store.current(), r#"{"name":"Day 1"}"#).unwrap();
        for _ in 0..segments {
            doc = gateway.add_segment(&doc, 0, r#"{"exercise":"squat"}"#).unwrap();
        }
        store.replace(doc);
    }

    #[test]
    fn test_counts_follow_replace() {
        let mut store = store();
        assert_eq!(store.day_count().unwrap(), 0);
        assert_eq!(store.segment_count(0).unwrap(), None);

        with_day_and_segments(&mut store, 2);
        assert_eq!(store.day_count().unwrap(), 1);
        assert_eq!(store.segment_count(0).unwrap(), Some(2));
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut store = store();
        let original = store.current().clone();
        let previous = store.replace(SerializedDocument::from(original.as_str()));
        assert_eq!(previous, original);
    }

    #[test]
    fn test_replace_revalidates_selection() {
        let mut store = store();
        with_day_and_segments(&mut store, 3);
        store.selection_mut().toggle(SegmentRef::new(0, 2));
        store.selection_mut().toggle(SegmentRef::new(0, 0));

        let gateway = store.gateway().clone();
        let shorter = gateway.remove_segment(store.current(), 0, 2).unwrap();
        store.replace(shorter);

        let selected: Vec<_> = store.selection().selected().collect();
        assert_eq!(selected, vec![SegmentRef::new(0, 0)]);
    }

    #[test]
    fn test_unreadable_document_clears_selection() {
        let mut store = store();
        with_day_and_segments(&mut store, 1);
        store.selection_mut().select_exclusive(SegmentRef::new(0, 0));

        store.replace(SerializedDocument::from("not a plan"));
        assert_eq!(store.selection(), &Selection::default());
        assert!(store.day_count().is_err());
    }
}
