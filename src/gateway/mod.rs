//! Call gateway: the editor's side of the engine boundary
//!
//! Every operation has the same shape: encode the arguments as
//! null-terminated buffers, invoke the entry point, adopt the returned
//! envelope, decode it, release it, and hand back either the payload or one
//! [`GatewayError`]. The gateway does no validation of its own; index
//! arguments are forwarded as-is and range errors come back from the engine.
//!
//! # Module Structure
//!
//! - `bindings`: function table of the C-ABI entry points
//! - `envelope`: scoped ownership and decoding of result envelopes
//! - `operation`: operation names used in errors and logs
//! - `error`: the typed failures a call can produce

pub mod bindings;
pub mod envelope;
pub mod error;
pub mod operation;

pub use bindings::EngineBindings;
pub use envelope::{Envelope, Reply};
pub use error::{GatewayError, UNEXPECTED_RESPONSE};
pub use operation::Operation;

use crate::ffi::PlanEngineResult;
use crate::models::{DocumentOutline, SerializedDocument, ValidationReport};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::ffi::CString;
use std::path::{Path, PathBuf};

/// Exercise groups as returned by the engine: name -> ordered exercise codes
pub type ExerciseGroups = BTreeMap<String, Vec<String>>;

/// Direction of a one-place segment move within its day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    pub fn offset(self) -> i32 {
        match self {
            MoveDirection::Up => -1,
            MoveDirection::Down => 1,
        }
    }
}

pub struct CallGateway {
    bindings: EngineBindings,
    app_support_dir: OnceCell<PathBuf>,
    cache_dir: OnceCell<PathBuf>,
    drafts_dir: OnceCell<PathBuf>,
}

// ============================================================================
// Encoding / decoding helpers
// ============================================================================

fn encode(operation: Operation, argument: &'static str, value: &str) -> Result<CString, GatewayError> {
    CString::new(value).map_err(|e| GatewayError::Encode {
        operation,
        argument,
        detail: e.to_string(),
    })
}

fn encode_path(operation: Operation, path: &Path) -> Result<CString, GatewayError> {
    let text = path.to_str().ok_or_else(|| GatewayError::Encode {
        operation,
        argument: "path",
        detail: format!("{} is not valid UTF-8", path.display()),
    })?;
    encode(operation, "path", text)
}

/// Parse a structured payload; a mismatch is logged with the full payload
fn parse_payload<T: DeserializeOwned>(operation: Operation, payload: &str) -> Result<T, GatewayError> {
    serde_json::from_str(payload).map_err(|e| {
        log::error!(
            "{} returned a payload of unexpected shape: {}; payload: {}",
            operation,
            e,
            payload
        );
        GatewayError::Decode {
            operation,
            detail: e.to_string(),
        }
    })
}

impl CallGateway {
    pub fn new(bindings: EngineBindings) -> Self {
        Self {
            bindings,
            app_support_dir: OnceCell::new(),
            cache_dir: OnceCell::new(),
            drafts_dir: OnceCell::new(),
        }
    }

    /// Gateway over the engine compiled into this library
    pub fn linked() -> Self {
        Self::new(EngineBindings::linked())
    }

    /// Invoke one entry point and turn its envelope into a payload or an error
    ///
    /// The envelope is released inside `decode` on every path.
    fn call<F>(&self, operation: Operation, invoke: F) -> Result<String, GatewayError>
    where
        F: FnOnce(&EngineBindings) -> PlanEngineResult,
    {
        log::debug!("{} called", operation);

        let raw = invoke(&self.bindings);
        let envelope = unsafe { Envelope::adopt(raw, self.bindings.free_result) };

        match envelope.decode(operation)? {
            Reply::Success(payload) => {
                log::debug!("{} completed successfully", operation);
                Ok(payload)
            }
            Reply::Failure(message) => {
                log::warn!("{} failed: {}", operation, message);
                Err(GatewayError::Boundary { operation, message })
            }
        }
    }

    fn call_document<F>(&self, operation: Operation, invoke: F) -> Result<SerializedDocument, GatewayError>
    where
        F: FnOnce(&EngineBindings) -> PlanEngineResult,
    {
        self.call(operation, invoke).map(SerializedDocument::from)
    }

    fn cached_dir<F>(&self, cell: &OnceCell<PathBuf>, operation: Operation, query: F) -> Result<PathBuf, GatewayError>
    where
        F: FnOnce(&EngineBindings) -> PlanEngineResult,
    {
        cell.get_or_try_init(|| self.call(operation, query).map(PathBuf::from))
            .cloned()
    }

    // ========================================================================
    // Document lifecycle
    // ========================================================================

    pub fn new_document(&self) -> Result<SerializedDocument, GatewayError> {
        self.call_document(Operation::NewDocument, |b| unsafe { (b.new)() })
    }

    pub fn open_document(&self, path: &Path) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::OpenDocument;
        let path = encode_path(op, path)?;
        self.call_document(op, |b| unsafe { (b.open)(path.as_ptr()) })
    }

    /// Write `document` to `path`; the engine does all file I/O
    pub fn save_document(&self, document: &SerializedDocument, path: &Path) -> Result<(), GatewayError> {
        let op = Operation::SaveDocument;
        let plan = encode(op, "document", document.as_str())?;
        let path = encode_path(op, path)?;
        self.call(op, |b| unsafe { (b.save)(plan.as_ptr(), path.as_ptr()) })
            .map(|_| ())
    }

    pub fn validate(&self, document: &SerializedDocument) -> Result<ValidationReport, GatewayError> {
        let op = Operation::ValidateDocument;
        let plan = encode(op, "document", document.as_str())?;
        let payload = self.call(op, |b| unsafe { (b.validate)(plan.as_ptr()) })?;
        parse_payload(op, &payload)
    }

    pub fn outline(&self, document: &SerializedDocument) -> Result<DocumentOutline, GatewayError> {
        let op = Operation::Outline;
        let plan = encode(op, "document", document.as_str())?;
        let payload = self.call(op, |b| unsafe { (b.outline)(plan.as_ptr()) })?;
        parse_payload(op, &payload)
    }

    // ========================================================================
    // Structural edits
    // ========================================================================

    pub fn add_segment(
        &self,
        document: &SerializedDocument,
        day_index: usize,
        segment_json: &str,
    ) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::AddSegment;
        let plan = encode(op, "document", document.as_str())?;
        let segment = encode(op, "segment", segment_json)?;
        self.call_document(op, |b| unsafe {
            (b.segment_add)(plan.as_ptr(), day_index, segment.as_ptr())
        })
    }

    pub fn remove_segment(
        &self,
        document: &SerializedDocument,
        day_index: usize,
        segment_index: usize,
    ) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::RemoveSegment;
        let plan = encode(op, "document", document.as_str())?;
        self.call_document(op, |b| unsafe {
            (b.segment_remove)(plan.as_ptr(), day_index, segment_index)
        })
    }

    pub fn update_segment(
        &self,
        document: &SerializedDocument,
        day_index: usize,
        segment_index: usize,
        segment_json: &str,
    ) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::UpdateSegment;
        let plan = encode(op, "document", document.as_str())?;
        let segment = encode(op, "segment", segment_json)?;
        self.call_document(op, |b| unsafe {
            (b.segment_update)(plan.as_ptr(), day_index, segment_index, segment.as_ptr())
        })
    }

    /// Swap a segment with its neighbour; moving past either end of the day
    /// is reported by the engine
    pub fn move_segment(
        &self,
        document: &SerializedDocument,
        day_index: usize,
        segment_index: usize,
        direction: MoveDirection,
    ) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::MoveSegment;
        let plan = encode(op, "document", document.as_str())?;
        self.call_document(op, |b| unsafe {
            (b.segment_move)(plan.as_ptr(), day_index, segment_index, direction.offset())
        })
    }

    pub fn add_day(&self, document: &SerializedDocument, day_json: &str) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::AddDay;
        let plan = encode(op, "document", document.as_str())?;
        let day = encode(op, "day", day_json)?;
        self.call_document(op, |b| unsafe { (b.day_add)(plan.as_ptr(), day.as_ptr()) })
    }

    pub fn remove_day(&self, document: &SerializedDocument, day_index: usize) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::RemoveDay;
        let plan = encode(op, "document", document.as_str())?;
        self.call_document(op, |b| unsafe { (b.day_remove)(plan.as_ptr(), day_index) })
    }

    /// Merge `attributes_json` into the day's attributes (`null` removes a key)
    pub fn update_day(
        &self,
        document: &SerializedDocument,
        day_index: usize,
        attributes_json: &str,
    ) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::UpdateDay;
        let plan = encode(op, "document", document.as_str())?;
        let attributes = encode(op, "day attributes", attributes_json)?;
        self.call_document(op, |b| unsafe {
            (b.day_update)(plan.as_ptr(), day_index, attributes.as_ptr())
        })
    }

    // ========================================================================
    // Exercise groups and dictionary
    // ========================================================================

    pub fn groups(&self, document: &SerializedDocument) -> Result<ExerciseGroups, GatewayError> {
        let op = Operation::GetGroups;
        let plan = encode(op, "document", document.as_str())?;
        let payload = self.call(op, |b| unsafe { (b.groups_get)(plan.as_ptr()) })?;
        parse_payload(op, &payload)
    }

    /// Add the group, or replace its exercise list if it already exists
    pub fn upsert_group(
        &self,
        document: &SerializedDocument,
        group_name: &str,
        exercises: &[String],
    ) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::UpsertGroup;
        let plan = encode(op, "document", document.as_str())?;
        let name = encode(op, "group name", group_name)?;
        let list = serde_json::to_string(exercises).map_err(|e| GatewayError::Encode {
            operation: op,
            argument: "exercise list",
            detail: e.to_string(),
        })?;
        let list = encode(op, "exercise list", &list)?;
        self.call_document(op, |b| unsafe {
            (b.group_add)(plan.as_ptr(), name.as_ptr(), list.as_ptr())
        })
    }

    pub fn remove_group(&self, document: &SerializedDocument, group_name: &str) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::RemoveGroup;
        let plan = encode(op, "document", document.as_str())?;
        let name = encode(op, "group name", group_name)?;
        self.call_document(op, |b| unsafe { (b.group_remove)(plan.as_ptr(), name.as_ptr()) })
    }

    pub fn add_dictionary_entry(
        &self,
        document: &SerializedDocument,
        code: &str,
        display_name: &str,
    ) -> Result<SerializedDocument, GatewayError> {
        let op = Operation::AddDictionaryEntry;
        let plan = encode(op, "document", document.as_str())?;
        let code = encode(op, "exercise code", code)?;
        let name = encode(op, "display name", display_name)?;
        self.call_document(op, |b| unsafe {
            (b.dictionary_add)(plan.as_ptr(), code.as_ptr(), name.as_ptr())
        })
    }

    // ========================================================================
    // Platform directories (fixed for the process lifetime, cached)
    // ========================================================================

    pub fn app_support_dir(&self) -> Result<PathBuf, GatewayError> {
        self.cached_dir(&self.app_support_dir, Operation::AppSupportDir, |b| unsafe {
            (b.app_support_dir)()
        })
    }

    pub fn cache_dir(&self) -> Result<PathBuf, GatewayError> {
        self.cached_dir(&self.cache_dir, Operation::CacheDir, |b| unsafe { (b.cache_dir)() })
    }

    pub fn drafts_dir(&self) -> Result<PathBuf, GatewayError> {
        self.cached_dir(&self.drafts_dir, Operation::DraftsDir, |b| unsafe { (b.drafts_dir)() })
    }
}

impl Default for CallGateway {
    fn default() -> Self {
        Self::linked()
    }
}

impl std::fmt::Debug for CallGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallGateway")
            .field("app_support_dir", &self.app_support_dir.get())
            .field("cache_dir", &self.cache_dir.get())
            .field("drafts_dir", &self.drafts_dir.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::live_buffers;
    use std::os::raw::c_char;
    use std::ptr;

    extern "C" fn garbage_groups(_plan: *const c_char) -> PlanEngineResult {
        PlanEngineResult {
            success: true,
            data: CString::new("[1,2,3]").unwrap().into_raw(),
            error: ptr::null_mut(),
        }
    }

    extern "C" fn silent_failure() -> PlanEngineResult {
        PlanEngineResult {
            success: false,
            data: ptr::null_mut(),
            error: CString::new("").unwrap().into_raw(),
        }
    }

    unsafe extern "C" fn free_test_result(result: PlanEngineResult) {
        for buffer in [result.data, result.error] {
            if !buffer.is_null() {
                drop(CString::from_raw(buffer));
            }
        }
    }

    fn doc_with_day(gateway: &CallGateway) -> SerializedDocument {
        let doc = gateway.new_document().unwrap();
        gateway.add_day(&doc, r#"{"name":"Day 1"}"#).unwrap()
    }

    #[test]
    fn test_new_document_returns_payload() {
        let gateway = CallGateway::linked();
        let doc = gateway.new_document().unwrap();
        assert!(doc.as_str().contains("\"schedule\":[]"));
    }

    #[test]
    fn test_remove_segment_out_of_range_is_boundary_failure() {
        let gateway = CallGateway::linked();
        let doc = doc_with_day(&gateway);
        let err = gateway.remove_segment(&doc, 0, 0).unwrap_err();
        assert_eq!(
            err,
            GatewayError::Boundary {
                operation: Operation::RemoveSegment,
                message: "Segment index 0 out of bounds".to_string(),
            }
        );
    }

    #[test]
    fn test_move_segment_swaps_neighbours() {
        let gateway = CallGateway::linked();
        let mut doc = doc_with_day(&gateway);
        doc = gateway.add_segment(&doc, 0, r#"{"exercise":"squat"}"#).unwrap();
        doc = gateway.add_segment(&doc, 0, r#"{"exercise":"bench"}"#).unwrap();

        let moved = gateway.move_segment(&doc, 0, 1, MoveDirection::Up).unwrap();
        assert!(moved.as_str().find("bench") < moved.as_str().find("squat"));

        let back = gateway.move_segment(&moved, 0, 0, MoveDirection::Down).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_move_segment_past_either_end_is_boundary_failure() {
        let gateway = CallGateway::linked();
        let doc = doc_with_day(&gateway);
        let doc = gateway.add_segment(&doc, 0, r#"{"exercise":"squat"}"#).unwrap();

        let err = gateway.move_segment(&doc, 0, 0, MoveDirection::Up).unwrap_err();
        assert_eq!(
            err,
            GatewayError::Boundary {
                operation: Operation::MoveSegment,
                message: "Segment 0 cannot move by -1".to_string(),
            }
        );
        let err = gateway.move_segment(&doc, 0, 0, MoveDirection::Down).unwrap_err();
        assert_eq!(err.user_message(), "Segment 0 cannot move by 1");
        let err = gateway.move_segment(&doc, 3, 0, MoveDirection::Down).unwrap_err();
        assert_eq!(err.user_message(), "Day index 3 out of bounds");
    }

    #[test]
    fn test_update_day_sets_and_clears_label() {
        let gateway = CallGateway::linked();
        let doc = doc_with_day(&gateway);

        let labelled = gateway.update_day(&doc, 0, r#"{"label":"Heavy"}"#).unwrap();
        assert!(labelled.as_str().contains(r#""label":"Heavy""#));

        let cleared = gateway.update_day(&labelled, 0, r#"{"label":null}"#).unwrap();
        assert_eq!(cleared, doc);

        let err = gateway.update_day(&doc, 1, r#"{"label":"x"}"#).unwrap_err();
        assert_eq!(
            err,
            GatewayError::Boundary {
                operation: Operation::UpdateDay,
                message: "Day index 1 out of bounds".to_string(),
            }
        );
    }

    #[test]
    fn test_interior_nul_argument_fails_before_the_call() {
        let gateway = CallGateway::linked();
        let doc = gateway.new_document().unwrap();
        let before = live_buffers();
        let err = gateway.add_day(&doc, "{\"name\":\"a\0b\"}").unwrap_err();
        assert!(matches!(err, GatewayError::Encode { argument: "day", .. }));
        assert_eq!(live_buffers(), before);
    }

    #[test]
    fn test_groups_round_trip() {
        let gateway = CallGateway::linked();
        let doc = gateway.new_document().unwrap();
        let exercises = vec!["BB.SQ".to_string(), "BB.DL".to_string()];
        let doc = gateway.upsert_group(&doc, "legs", &exercises).unwrap();

        let groups = gateway.groups(&doc).unwrap();
        assert_eq!(groups.get("legs"), Some(&exercises));

        let doc = gateway.remove_group(&doc, "legs").unwrap();
        assert!(gateway.groups(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_validate_returns_report() {
        let gateway = CallGateway::linked();
        let doc = doc_with_day(&gateway);
        let doc = gateway.add_segment(&doc, 0, r#"{"exercise":"squat"}"#).unwrap();
        let report = gateway.validate(&doc).unwrap();
        assert!(report.by_code().contains_key("E102"));

        let doc = gateway.add_dictionary_entry(&doc, "squat", "Back Squat").unwrap();
        let report = gateway.validate(&doc).unwrap();
        assert!(!report.by_code().contains_key("E102"));
    }

    #[test]
    fn test_malformed_payload_is_decode_error() {
        let gateway = CallGateway::new(EngineBindings {
            groups_get: garbage_groups,
            free_result: free_test_result,
            ..EngineBindings::linked()
        });
        let doc = SerializedDocument::from("{}");
        let err = gateway.groups(&doc).unwrap_err();
        assert!(matches!(err, GatewayError::Decode { operation: Operation::GetGroups, .. }));
        assert_eq!(err.user_message(), UNEXPECTED_RESPONSE);
    }

    #[test]
    fn test_empty_engine_error_uses_fallback_message() {
        let gateway = CallGateway::new(EngineBindings {
            new: silent_failure,
            free_result: free_test_result,
            ..EngineBindings::linked()
        });
        let err = gateway.new_document().unwrap_err();
        assert_eq!(err.user_message(), "unknown error performing new document");
    }

    #[test]
    fn test_directory_queries_are_idempotent() {
        let gateway = CallGateway::linked();
        // Skip where the platform has no home directory to resolve against.
        let Ok(first) = gateway.drafts_dir() else {
            return;
        };
        assert_eq!(gateway.drafts_dir().unwrap(), first);
        if let (Ok(a), Ok(b)) = (gateway.cache_dir(), gateway.cache_dir()) {
            assert_eq!(a, b);
        }
    }
}
