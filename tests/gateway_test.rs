// Boundary round trips through the C-ABI entry points

use plan_editor::ffi::{live_buffers, plan_engine_free_result, plan_engine_new};
use plan_editor::gateway::{CallGateway, GatewayError, Operation};
use plan_editor::SerializedDocument;
use std::path::PathBuf;

fn gateway() -> CallGateway {
    CallGateway::linked()
}

#[test]
fn test_repeated_new_calls_release_every_buffer() {
    let gateway = gateway();
    let before = live_buffers();

    for _ in 0..10_000 {
        gateway.new_document().expect("new document should succeed");
    }

    assert_eq!(live_buffers(), before, "every envelope should be released exactly once");
}

#[test]
fn test_failure_paths_release_every_buffer() {
    let gateway = gateway();
    let doc = gateway.new_document().unwrap();
    let before = live_buffers();

    for i in 0..500 {
        let err = gateway.remove_day(&doc, i).unwrap_err();
        assert!(err.is_boundary());
    }
    gateway.add_day(&doc, "not json").unwrap_err();

    assert_eq!(live_buffers(), before);
}

#[test]
fn test_raw_envelope_is_exclusive() {
    let before = live_buffers();
    let result = plan_engine_new();
    assert!(result.success);
    assert!(!result.data.is_null());
    assert!(result.error.is_null());
    assert_eq!(live_buffers(), before + 1);

    unsafe { plan_engine_free_result(result) };
    assert_eq!(live_buffers(), before);
}

#[test]
fn test_save_then_open_round_trip() {
    let gateway = gateway();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.json");

    let mut doc = gateway.new_document().unwrap();
    doc = gateway.add_day(&doc, r#"{"name":"Day 1"}"#).unwrap();
    doc = gateway.add_segment(&doc, 0, r#"{"exercise":"squat","sets":5}"#).unwrap();
    doc = gateway.add_dictionary_entry(&doc, "squat", "Back Squat").unwrap();
    doc = gateway
        .upsert_group(&doc, "legs", &["squat".to_string()])
        .unwrap();

    gateway.save_document(&doc, &path).unwrap();
    let reopened = gateway.open_document(&path).unwrap();

    assert_eq!(reopened, doc, "open(save(D)) should reproduce D byte for byte");
}

#[test]
fn test_open_missing_file_is_boundary_failure() {
    let gateway = gateway();
    let err = gateway
        .open_document(std::path::Path::new("/nonexistent/dir/plan.json"))
        .unwrap_err();
    assert_eq!(err.operation(), Operation::OpenDocument);
    assert!(err.to_string().starts_with("open document failed: "));
}

#[test]
fn test_index_failures_come_from_the_engine() {
    let gateway = gateway();
    let doc = gateway.new_document().unwrap();
    let doc = gateway.add_day(&doc, r#"{"name":"Day 1"}"#).unwrap();

    let err = gateway.remove_segment(&doc, 0, 3).unwrap_err();
    assert_eq!(
        err,
        GatewayError::Boundary {
            operation: Operation::RemoveSegment,
            message: "Segment index 3 out of bounds".to_string(),
        }
    );

    let err = gateway.update_segment(&doc, 4, 0, "{}").unwrap_err();
    assert_eq!(err.user_message(), "Day index 4 out of bounds");
}

#[test]
fn test_operations_are_pure() {
    let gateway = gateway();
    let doc = gateway.new_document().unwrap();
    let a = gateway.add_day(&doc, r#"{"name":"Day 1"}"#).unwrap();
    let b = gateway.add_day(&doc, r#"{"name":"Day 1"}"#).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, doc);
}

#[test]
fn test_outline_tracks_structure() {
    let gateway = gateway();
    let mut doc = gateway.new_document().unwrap();
    doc = gateway.add_day(&doc, r#"{"name":"Day 1"}"#).unwrap();
    doc = gateway.add_day(&doc, r#"{"name":"Day 2"}"#).unwrap();
    doc = gateway.add_segment(&doc, 1, r#"{"exercise":"bench"}"#).unwrap();

    let outline = gateway.outline(&doc).unwrap();
    assert_eq!(outline.segment_counts, vec![0, 1]);

    let doc = gateway.remove_day(&doc, 0).unwrap();
    assert_eq!(gateway.outline(&doc).unwrap().segment_counts, vec![1]);
}

#[test]
fn test_outline_of_garbage_is_boundary_failure() {
    let gateway = gateway();
    let err = gateway
        .outline(&SerializedDocument::from("{not json"))
        .unwrap_err();
    assert!(err.is_boundary());
}

fn assert_stable<F>(query: F)
where
    F: Fn() -> Result<PathBuf, GatewayError>,
{
    match query() {
        Ok(first) => {
            assert!(first.is_absolute());
            assert_eq!(query().unwrap(), first);
        }
        // No home directory on this host; the failure must be reported, not a panic.
        Err(err) => assert!(err.is_boundary()),
    }
}

#[test]
fn test_directory_queries_are_idempotent() {
    let gateway = gateway();
    assert_stable(|| gateway.app_support_dir());
    assert_stable(|| gateway.cache_dir());
    assert_stable(|| gateway.drafts_dir());
}
