//! Training plan editor core
//!
//! Two halves share this library:
//!
//! - the native engine (`engine`, `ffi`): plan documents, structural edits and
//!   validation behind `extern "C"` entry points that exchange null-terminated
//!   JSON buffers inside a [`ffi::PlanEngineResult`] envelope;
//! - the editor side (`gateway`, `history`, `store`, `session`): calls the
//!   engine only through those entry points and keeps snapshot undo/redo over
//!   the documents it returns.

pub mod config;
pub mod engine;
pub mod ffi;
pub mod gateway;
pub mod history;
pub mod logging;
pub mod models;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigError, EditorConfig};
pub use gateway::{CallGateway, EngineBindings, GatewayError, MoveDirection, Operation};
pub use history::{HistoryEntry, HistoryStack};
pub use models::{DocumentOutline, SerializedDocument, ValidationReport};
pub use session::{EditorSession, SessionContext, SessionError};
pub use store::{DocumentStore, Selection};
