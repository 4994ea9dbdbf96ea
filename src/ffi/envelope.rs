//! Result envelope and buffer ownership on the native side
//!
//! Every entry point returns a [`PlanEngineResult`] by value. Its buffers are
//! allocated here with `CString::into_raw` and may only be reclaimed by
//! [`plan_engine_free_result`] (or [`plan_engine_free_string`] for a single
//! buffer), never by the caller's allocator.

use crate::engine::{EngineError, EngineResult};
use std::cell::Cell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

/// Tagged result returned by every engine entry point
///
/// `success == true` carries `data` and a null `error`; `success == false`
/// carries `error` (possibly an empty string) and a null `data`.
#[repr(C)]
#[derive(Debug)]
pub struct PlanEngineResult {
    pub success: bool,
    pub data: *mut c_char,
    pub error: *mut c_char,
}

thread_local! {
    // Calls are synchronous, so allocation and release happen on the caller's
    // thread and a per-thread count is exact.
    static LIVE_BUFFERS: Cell<isize> = const { Cell::new(0) };
}

/// Number of engine buffers handed out on this thread and not yet released
pub fn live_buffers() -> isize {
    LIVE_BUFFERS.with(Cell::get)
}

fn into_buffer(text: CString) -> *mut c_char {
    LIVE_BUFFERS.with(|count| count.set(count.get() + 1));
    text.into_raw()
}

// ============================================================================
// Envelope construction
// ============================================================================

pub(crate) fn success_result(operation: &'static str, data: String) -> PlanEngineResult {
    match CString::new(data) {
        Ok(text) => PlanEngineResult {
            success: true,
            data: into_buffer(text),
            error: ptr::null_mut(),
        },
        Err(_) => failure_result(&EngineError::InteriorNul(operation).to_string()),
    }
}

pub(crate) fn failure_result(message: &str) -> PlanEngineResult {
    let text = CString::new(message.replace('\0', "")).unwrap_or_default();
    PlanEngineResult {
        success: false,
        data: ptr::null_mut(),
        error: into_buffer(text),
    }
}

/// Run one engine operation and wrap its outcome in an envelope
///
/// A panic inside the operation is converted into a failure envelope so that
/// nothing unwinds across the C boundary.
pub(crate) fn guarded<F>(operation: &'static str, call: F) -> PlanEngineResult
where
    F: FnOnce() -> EngineResult<String>,
{
    log::debug!("{} called", operation);

    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(data)) => {
            log::debug!("{} completed successfully ({} bytes)", operation, data.len());
            success_result(operation, data)
        }
        Ok(Err(err)) => {
            log::warn!("{} failed: {}", operation, err);
            failure_result(&err.to_string())
        }
        Err(_) => {
            log::error!("{} panicked", operation);
            failure_result(&EngineError::Panic(operation).to_string())
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Frees a string allocated by the engine. Null is ignored.
///
/// # Safety
/// `ptr` must be null or a buffer obtained from a [`PlanEngineResult`] that
/// has not been released yet.
#[no_mangle]
pub unsafe extern "C" fn plan_engine_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(CString::from_raw(ptr));
    LIVE_BUFFERS.with(|count| count.set(count.get() - 1));
}

/// Frees both buffers of a result envelope
///
/// # Safety
/// `result` must come from an engine entry point and must be released at
/// most once.
#[no_mangle]
pub unsafe extern "C" fn plan_engine_free_result(result: PlanEngineResult) {
    plan_engine_free_string(result.data);
    plan_engine_free_string(result.error);
}
