//! Platform directories
//!
//! Resolved with the `dirs` crate. The engine only reports these paths; it
//! never creates them.
//!
//! - app support: `~/Library/Application Support/plan-editor` (macOS),
//!   `~/.local/share/plan-editor` (Linux)
//! - cache: `~/Library/Caches/plan-editor`, `~/.cache/plan-editor`
//! - drafts: `<app support>/drafts` on macOS, `~/.local/state/plan-editor/drafts`
//!   elsewhere

use super::error::{EngineError, EngineResult};
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "plan-editor";
const DRAFTS_DIR_NAME: &str = "drafts";

pub fn app_support_dir() -> EngineResult<PathBuf> {
    let base = dirs::data_dir().ok_or(EngineError::NoPlatformDir("application support"))?;
    Ok(base.join(APP_DIR_NAME))
}

pub fn cache_dir() -> EngineResult<PathBuf> {
    let base = dirs::cache_dir().ok_or(EngineError::NoPlatformDir("cache"))?;
    Ok(base.join(APP_DIR_NAME))
}

pub fn drafts_dir() -> EngineResult<PathBuf> {
    // macOS has no separate state directory
    let base = if cfg!(target_os = "macos") {
        dirs::data_dir()
    } else {
        dirs::state_dir().or_else(dirs::data_dir)
    };
    let base = base.ok_or(EngineError::NoPlatformDir("drafts"))?;
    Ok(base.join(APP_DIR_NAME).join(DRAFTS_DIR_NAME))
}
