//! Models module for the plan editor
//!
//! Value types that cross the engine boundary: the opaque serialized
//! document handled by the editor, the plan model only the engine parses,
//! and the structured payloads both sides agree on.

pub mod document;
pub mod outline;
pub mod plan;
pub mod validation;

// Re-export commonly used types
pub use document::SerializedDocument;
pub use outline::DocumentOutline;
pub use plan::{Day, Plan, Segment, Unit, DEFAULT_PLAN_NAME};
pub use validation::{IssueLocation, ValidationIssue, ValidationReport};
