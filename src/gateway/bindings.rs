//! Function table for the engine's C-ABI entry points
//!
//! The gateway only ever reaches the engine through these pointers, so the
//! same code can drive the in-process engine or any library exposing the
//! `plan_engine.h` interface.

use crate::ffi::{self, PlanEngineResult};
use std::os::raw::c_char;

pub type FreeResultFn = unsafe extern "C" fn(PlanEngineResult);

type Query0 = unsafe extern "C" fn() -> PlanEngineResult;
type Query1 = unsafe extern "C" fn(*const c_char) -> PlanEngineResult;
type Query2 = unsafe extern "C" fn(*const c_char, *const c_char) -> PlanEngineResult;
type Query3 = unsafe extern "C" fn(*const c_char, *const c_char, *const c_char) -> PlanEngineResult;

#[derive(Clone, Copy)]
pub struct EngineBindings {
    pub new: Query0,
    pub open: Query1,
    pub save: Query2,
    pub validate: Query1,
    pub outline: Query1,
    pub segment_add: unsafe extern "C" fn(*const c_char, usize, *const c_char) -> PlanEngineResult,
    pub segment_remove: unsafe extern "C" fn(*const c_char, usize, usize) -> PlanEngineResult,
    pub segment_update:
        unsafe extern "C" fn(*const c_char, usize, usize, *const c_char) -> PlanEngineResult,
    pub segment_move: unsafe extern "C" fn(*const c_char, usize, usize, i32) -> PlanEngineResult,
    pub day_add: Query2,
    pub day_remove: unsafe extern "C" fn(*const c_char, usize) -> PlanEngineResult,
    pub day_update: unsafe extern "C" fn(*const c_char, usize, *const c_char) -> PlanEngineResult,
    pub groups_get: Query1,
    pub group_add: Query3,
    pub group_remove: Query2,
    pub dictionary_add: Query3,
    pub app_support_dir: Query0,
    pub cache_dir: Query0,
    pub drafts_dir: Query0,
    /// The only way envelopes obtained through this table may be released
    pub free_result: FreeResultFn,
}

impl EngineBindings {
    /// Entry points of the engine compiled into this library
    pub fn linked() -> Self {
        Self {
            new: ffi::plan_engine_new,
            open: ffi::plan_engine_open,
            save: ffi::plan_engine_save,
            validate: ffi::plan_engine_validate,
            outline: ffi::plan_engine_outline,
            segment_add: ffi::plan_engine_segment_add,
            segment_remove: ffi::plan_engine_segment_remove,
            segment_update: ffi::plan_engine_segment_update,
            segment_move: ffi::plan_engine_segment_move,
            day_add: ffi::plan_engine_day_add,
            day_remove: ffi::plan_engine_day_remove,
            day_update: ffi::plan_engine_day_update,
            groups_get: ffi::plan_engine_groups_get,
            group_add: ffi::plan_engine_group_add,
            group_remove: ffi::plan_engine_group_remove,
            dictionary_add: ffi::plan_engine_dictionary_add,
            app_support_dir: ffi::plan_engine_app_support_dir,
            cache_dir: ffi::plan_engine_cache_dir,
            drafts_dir: ffi::plan_engine_drafts_dir,
            free_result: ffi::plan_engine_free_result,
        }
    }
}

impl Default for EngineBindings {
    fn default() -> Self {
        Self::linked()
    }
}

impl std::fmt::Debug for EngineBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBindings").finish_non_exhaustive()
    }
}
