//! C-ABI entry points of the plan engine
//!
//! Each function accepts null-terminated UTF-8 arguments, runs one engine
//! operation and returns a [`PlanEngineResult`]. Documents travel as JSON
//! text in both directions. The caller owns nothing in the returned envelope
//! until it hands it back to `plan_engine_free_result`.
//!
//! # Safety
//! Every pointer argument must be null or point to a null-terminated buffer
//! that stays valid for the duration of the call.

use super::envelope::{guarded, PlanEngineResult};
use crate::engine::{operations, paths, EngineError, EngineResult};
use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::PathBuf;

/// Borrow a text argument for the duration of one call
unsafe fn arg<'a>(ptr: *const c_char, name: &'static str) -> EngineResult<&'a str> {
    if ptr.is_null() {
        return Err(EngineError::NullArgument(name));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|e| EngineError::InvalidUtf8 {
            arg: name,
            detail: e.to_string(),
        })
}

fn path_text(path: PathBuf) -> EngineResult<String> {
    path.into_os_string()
        .into_string()
        .map_err(|raw| EngineError::InvalidUtf8 {
            arg: "directory",
            detail: raw.to_string_lossy().into_owned(),
        })
}

// ============================================================================
// Plan Operations
// ============================================================================

/// Creates a new empty plan and returns it as JSON
#[no_mangle]
pub extern "C" fn plan_engine_new() -> PlanEngineResult {
    guarded("new", operations::new_plan)
}

/// Opens a plan from a file path and returns it as JSON
#[no_mangle]
pub unsafe extern "C" fn plan_engine_open(path: *const c_char) -> PlanEngineResult {
    guarded("open", || {
        let path = unsafe { arg(path, "path")? };
        operations::open_plan(path)
    })
}

/// Writes `plan_json` to `path`
#[no_mangle]
pub unsafe extern "C" fn plan_engine_save(
    plan_json: *const c_char,
    path: *const c_char,
) -> PlanEngineResult {
    guarded("save", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        let path = unsafe { arg(path, "path")? };
        operations::save_plan(plan, path)
    })
}

/// Validates a plan; the payload is a JSON validation report
#[no_mangle]
pub unsafe extern "C" fn plan_engine_validate(plan_json: *const c_char) -> PlanEngineResult {
    guarded("validate", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        operations::validate_plan(plan)
    })
}

/// Returns the segment count of every day as JSON
#[no_mangle]
pub unsafe extern "C" fn plan_engine_outline(plan_json: *const c_char) -> PlanEngineResult {
    guarded("outline", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        operations::plan_outline(plan)
    })
}

// ============================================================================
// Segment Operations
// ============================================================================

/// Appends a segment to a day
#[no_mangle]
pub unsafe extern "C" fn plan_engine_segment_add(
    plan_json: *const c_char,
    day_index: usize,
    segment_json: *const c_char,
) -> PlanEngineResult {
    guarded("segment_add", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        let segment = unsafe { arg(segment_json, "segment_json")? };
        operations::add_segment(plan, day_index, segment)
    })
}

/// Removes the segment at `segment_index` from a day
#[no_mangle]
pub unsafe extern "C" fn plan_engine_segment_remove(
    plan_json: *const c_char,
    day_index: usize,
    segment_index: usize,
) -> PlanEngineResult {
    guarded("segment_remove", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        operations::remove_segment(plan, day_index, segment_index)
    })
}

/// Replaces the segment at `segment_index` with `segment_json`
#[no_mangle]
pub unsafe extern "C" fn plan_engine_segment_update(
    plan_json: *const c_char,
    day_index: usize,
    segment_index: usize,
    segment_json: *const c_char,
) -> PlanEngineResult {
    guarded("segment_update", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        let segment = unsafe { arg(segment_json, "segment_json")? };
        operations::update_segment(plan, day_index, segment_index, segment)
    })
}

/// Moves a segment `offset` places within its day (-1 up, +1 down)
#[no_mangle]
pub unsafe extern "C" fn plan_engine_segment_move(
    plan_json: *const c_char,
    day_index: usize,
    segment_index: usize,
    offset: i32,
) -> PlanEngineResult {
    guarded("segment_move", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        operations::move_segment(plan, day_index, segment_index, offset)
    })
}

// ============================================================================
// Day Operations
// ============================================================================

/// Appends a day to the schedule
#[no_mangle]
pub unsafe extern "C" fn plan_engine_day_add(
    plan_json: *const c_char,
    day_json: *const c_char,
) -> PlanEngineResult {
    guarded("day_add", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        let day = unsafe { arg(day_json, "day_json")? };
        operations::add_day(plan, day)
    })
}

/// Removes the day at `day_index` with all its segments
#[no_mangle]
pub unsafe extern "C" fn plan_engine_day_remove(
    plan_json: *const c_char,
    day_index: usize,
) -> PlanEngineResult {
    guarded("day_remove", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        operations::remove_day(plan, day_index)
    })
}

/// Merges `attributes_json` into a day's attributes (label, goal, ...)
#[no_mangle]
pub unsafe extern "C" fn plan_engine_day_update(
    plan_json: *const c_char,
    day_index: usize,
    attributes_json: *const c_char,
) -> PlanEngineResult {
    guarded("day_update", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        let attributes = unsafe { arg(attributes_json, "attributes_json")? };
        operations::update_day(plan, day_index, attributes)
    })
}

// ============================================================================
// Exercise Group and Dictionary Operations
// ============================================================================

/// Returns the plan's groups as a JSON object of name -> exercise codes
#[no_mangle]
pub unsafe extern "C" fn plan_engine_groups_get(plan_json: *const c_char) -> PlanEngineResult {
    guarded("groups_get", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        operations::get_groups(plan)
    })
}

/// Adds or replaces a group; `exercises_json` is a JSON array of codes
#[no_mangle]
pub unsafe extern "C" fn plan_engine_group_add(
    plan_json: *const c_char,
    group_name: *const c_char,
    exercises_json: *const c_char,
) -> PlanEngineResult {
    guarded("group_add", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        let name = unsafe { arg(group_name, "group_name")? };
        let exercises = unsafe { arg(exercises_json, "exercises_json")? };
        operations::upsert_group(plan, name, exercises)
    })
}

/// Removes a group; an unknown name leaves the plan unchanged
#[no_mangle]
pub unsafe extern "C" fn plan_engine_group_remove(
    plan_json: *const c_char,
    group_name: *const c_char,
) -> PlanEngineResult {
    guarded("group_remove", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        let name = unsafe { arg(group_name, "group_name")? };
        operations::remove_group(plan, name)
    })
}

/// Adds or updates an exercise dictionary entry
#[no_mangle]
pub unsafe extern "C" fn plan_engine_dictionary_add(
    plan_json: *const c_char,
    exercise_code: *const c_char,
    exercise_name: *const c_char,
) -> PlanEngineResult {
    guarded("dictionary_add", || {
        let plan = unsafe { arg(plan_json, "plan_json")? };
        let code = unsafe { arg(exercise_code, "exercise_code")? };
        let name = unsafe { arg(exercise_name, "exercise_name")? };
        operations::add_dictionary_entry(plan, code, name)
    })
}

// ============================================================================
// Platform Paths
// ============================================================================

/// Returns the application support directory (not created)
#[no_mangle]
pub extern "C" fn plan_engine_app_support_dir() -> PlanEngineResult {
    guarded("app_support_dir", || path_text(paths::app_support_dir()?))
}

/// Returns the cache directory (not created)
#[no_mangle]
pub extern "C" fn plan_engine_cache_dir() -> PlanEngineResult {
    guarded("cache_dir", || path_text(paths::cache_dir()?))
}

/// Returns the autosave drafts directory (not created)
#[no_mangle]
pub extern "C" fn plan_engine_drafts_dir() -> PlanEngineResult {
    guarded("drafts_dir", || path_text(paths::drafts_dir()?))
}
