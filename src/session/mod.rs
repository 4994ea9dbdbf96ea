//! Editing session
//!
//! Ties the gateway, the document store, the history and autosave together.
//! Each undoable action is exactly one boundary call:
//!
//! 1. the gateway computes the new document from the current one,
//! 2. on success the history records the previous document (clearing redo),
//! 3. the store adopts the new document.
//!
//! A failed call leaves the document, the history and the selection as they
//! were. Every mutating method takes `&mut self`, so two actions can never
//! start from the same base document.

pub mod autosave;
pub mod context;

pub use autosave::Autosave;
pub use context::SessionContext;

use crate::config::ConfigError;
use crate::gateway::{CallGateway, ExerciseGroups, GatewayError, MoveDirection};
use crate::history::HistoryStack;
use crate::models::{SerializedDocument, ValidationReport};
use crate::store::DocumentStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Document has no file path; use save as")]
    NoFilePath,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SessionError {
    /// Text for an error dialog
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Gateway(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

pub struct EditorSession {
    gateway: Arc<CallGateway>,
    store: DocumentStore,
    history: HistoryStack,
    autosave: Autosave,
}

impl EditorSession {
    fn with_document(ctx: &SessionContext, document: SerializedDocument) -> Self {
        let gateway = Arc::clone(ctx.gateway());
        Self {
            store: DocumentStore::new(Arc::clone(&gateway), document),
            history: HistoryStack::new(ctx.config().history_limit),
            autosave: Autosave::new(&ctx.config().autosave),
            gateway,
        }
    }

    /// Start a session on a fresh plan
    pub fn create(ctx: &SessionContext) -> SessionResult<Self> {
        log::info!("EditorSession::create called");
        let document = ctx.gateway().new_document()?;
        Ok(Self::with_document(ctx, document))
    }

    /// Start a session on the plan stored at `path`
    pub fn open(ctx: &SessionContext, path: &Path) -> SessionResult<Self> {
        log::info!("EditorSession::open called: {}", path.display());
        let document = ctx.gateway().open_document(path)?;
        let mut session = Self::with_document(ctx, document);
        session.store.set_file_path(Some(path.to_path_buf()));
        Ok(session)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current(&self) -> &SerializedDocument {
        self.store.current()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Mutable access for selection and focus changes
    pub fn store_mut(&mut self) -> &mut DocumentStore {
        &mut self.store
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn autosave(&self) -> &Autosave {
        &self.autosave
    }

    pub fn is_modified(&self) -> bool {
        self.store.is_modified()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.store.file_path()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_title(&self) -> String {
        self.history.undo_title()
    }

    pub fn redo_title(&self) -> String {
        self.history.redo_title()
    }

    pub fn day_count(&self) -> SessionResult<usize> {
        Ok(self.store.day_count()?)
    }

    pub fn segment_count(&self, day: usize) -> SessionResult<Option<usize>> {
        Ok(self.store.segment_count(day)?)
    }

    // ========================================================================
    // Replacing the whole document
    // ========================================================================

    /// Replace the session's plan with a fresh one; history is discarded
    pub fn new_document(&mut self) -> SessionResult<()> {
        let document = self.gateway.new_document()?;
        self.reset(document, None);
        Ok(())
    }

    /// Replace the session's plan with the one at `path`; history is discarded
    pub fn open_document(&mut self, path: &Path) -> SessionResult<()> {
        let document = self.gateway.open_document(path)?;
        self.reset(document, Some(path.to_path_buf()));
        Ok(())
    }

    fn reset(&mut self, document: SerializedDocument, path: Option<PathBuf>) {
        self.store.replace(document);
        self.store.selection_mut().clear();
        self.store.set_file_path(path);
        self.store.set_modified(false);
        self.history.clear();
    }

    // ========================================================================
    // Undoable actions
    // ========================================================================

    /// Run one boundary call and commit its result
    fn apply<F>(&mut self, label: &str, edit: F) -> SessionResult<()>
    where
        F: FnOnce(&CallGateway, &SerializedDocument) -> Result<SerializedDocument, GatewayError>,
    {
        log::info!("{} called", label);

        let next = edit(self.gateway.as_ref(), self.store.current()).map_err(|e| {
            log::warn!("{} rejected: {}", label, e);
            e
        })?;

        let previous = self.store.replace(next);
        self.history.record(previous, Some(label.to_string()));
        self.store.set_modified(true);

        log::info!("{} completed successfully", label);
        self.after_action();
        Ok(())
    }

    pub fn add_day(&mut self, day_json: &str) -> SessionResult<()> {
        self.apply("Add Day", |gateway, doc| gateway.add_day(doc, day_json))
    }

    pub fn remove_day(&mut self, day_index: usize) -> SessionResult<()> {
        self.apply("Remove Day", |gateway, doc| gateway.remove_day(doc, day_index))
    }

    pub fn update_day(&mut self, day_index: usize, attributes_json: &str) -> SessionResult<()> {
        self.apply("Update Day", |gateway, doc| {
            gateway.update_day(doc, day_index, attributes_json)
        })
    }

    /// Set the day's label; an empty label removes it
    pub fn update_day_label(&mut self, day_index: usize, label: &str) -> SessionResult<()> {
        let label = if label.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::Value::from(label)
        };
        let attributes = serde_json::json!({ "label": label }).to_string();
        self.update_day(day_index, &attributes)
    }

    pub fn add_segment(&mut self, day_index: usize, segment_json: &str) -> SessionResult<()> {
        self.apply("Add Segment", |gateway, doc| {
            gateway.add_segment(doc, day_index, segment_json)
        })
    }

    pub fn remove_segment(&mut self, day_index: usize, segment_index: usize) -> SessionResult<()> {
        self.apply("Remove Segment", |gateway, doc| {
            gateway.remove_segment(doc, day_index, segment_index)
        })
    }

    pub fn update_segment(
        &mut self,
        day_index: usize,
        segment_index: usize,
        segment_json: &str,
    ) -> SessionResult<()> {
        self.apply("Update Segment", |gateway, doc| {
            gateway.update_segment(doc, day_index, segment_index, segment_json)
        })
    }

    pub fn move_segment(
        &mut self,
        day_index: usize,
        segment_index: usize,
        direction: MoveDirection,
    ) -> SessionResult<()> {
        self.apply("Move Segment", |gateway, doc| {
            gateway.move_segment(doc, day_index, segment_index, direction)
        })
    }

    pub fn upsert_group(&mut self, group_name: &str, exercises: &[String]) -> SessionResult<()> {
        self.apply("Update Group", |gateway, doc| {
            gateway.upsert_group(doc, group_name, exercises)
        })
    }

    pub fn remove_group(&mut self, group_name: &str) -> SessionResult<()> {
        self.apply("Remove Group", |gateway, doc| gateway.remove_group(doc, group_name))
    }

    pub fn add_dictionary_entry(&mut self, code: &str, display_name: &str) -> SessionResult<()> {
        self.apply("Add Dictionary Entry", |gateway, doc| {
            gateway.add_dictionary_entry(doc, code, display_name)
        })
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    /// Step back one action; `false` when there was nothing to undo
    pub fn undo(&mut self) -> bool {
        let current = self.store.current().clone();
        match self.history.undo(current) {
            Some(previous) => {
                log::info!("Undo completed");
                self.store.replace(previous);
                self.store.set_modified(true);
                self.after_action();
                true
            }
            None => {
                log::debug!("Undo requested with empty history");
                false
            }
        }
    }

    /// Step forward one undone action; `false` when there was nothing to redo
    pub fn redo(&mut self) -> bool {
        let current = self.store.current().clone();
        match self.history.redo(current) {
            Some(next) => {
                log::info!("Redo completed");
                self.store.replace(next);
                self.store.set_modified(true);
                self.after_action();
                true
            }
            None => {
                log::debug!("Redo requested with empty history");
                false
            }
        }
    }

    // ========================================================================
    // Queries and persistence
    // ========================================================================

    pub fn validate(&self) -> SessionResult<ValidationReport> {
        Ok(self.gateway.validate(self.store.current())?)
    }

    pub fn groups(&self) -> SessionResult<ExerciseGroups> {
        Ok(self.gateway.groups(self.store.current())?)
    }

    /// Save to the current file path
    pub fn save(&mut self) -> SessionResult<()> {
        let path = self
            .store
            .file_path()
            .map(Path::to_path_buf)
            .ok_or(SessionError::NoFilePath)?;
        self.write_to(&path)
    }

    /// Save to `path` and make it the session's file path
    pub fn save_as(&mut self, path: &Path) -> SessionResult<()> {
        self.write_to(path)?;
        self.store.set_file_path(Some(path.to_path_buf()));
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> SessionResult<()> {
        log::info!("save called: {}", path.display());
        self.gateway.save_document(self.store.current(), path)?;
        self.store.set_modified(false);
        log::info!("save completed successfully");
        Ok(())
    }

    // ========================================================================
    // Autosave
    // ========================================================================

    fn after_action(&mut self) {
        let now = Instant::now();
        if !self.autosave.is_due(self.store.is_modified(), now) {
            return;
        }
        match self.write_draft() {
            Ok(path) => {
                self.autosave.mark_written(now);
                log::info!("Autosaved draft to: {}", path.display());
            }
            Err(e) => log::warn!("Autosave failed: {}", e),
        }
    }

    fn write_draft(&self) -> SessionResult<PathBuf> {
        let drafts_dir = self.gateway.drafts_dir()?;
        std::fs::create_dir_all(&drafts_dir).map_err(|source| SessionError::Io {
            path: drafts_dir.clone(),
            source,
        })?;
        let path = self.autosave.draft_path(&drafts_dir);
        self.gateway.save_document(self.store.current(), &path)?;
        Ok(path)
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("store", &self.store)
            .field("history", &self.history)
            .field("autosave", &self.autosave)
            .finish()
    }
}
