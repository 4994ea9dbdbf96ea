//! Cooperative draft autosave
//!
//! There is no timer thread. The session asks [`Autosave::is_due`] after each
//! completed action and writes a draft when it says so. Drafts exist for
//! crash recovery only; writing one never marks the document as saved.

use crate::config::AutosaveConfig;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Autosave {
    enabled: bool,
    interval: Duration,
    draft_id: Uuid,
    /// Session start until the first draft is written
    last_draft: Instant,
    drafts_written: usize,
}

impl Autosave {
    pub fn new(config: &AutosaveConfig) -> Self {
        Self {
            enabled: config.enabled,
            interval: Duration::from_secs(config.interval_secs),
            draft_id: Uuid::new_v4(),
            last_draft: Instant::now(),
            drafts_written: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Draft identifier, stable for the lifetime of the session
    pub fn draft_id(&self) -> Uuid {
        self.draft_id
    }

    pub fn drafts_written(&self) -> usize {
        self.drafts_written
    }

    /// Whether a draft should be written now
    ///
    /// # Parameters
    /// * `modified` - the document has changes not yet saved to its file
    /// * `now` - time of the check
    pub fn is_due(&self, modified: bool, now: Instant) -> bool {
        self.enabled && modified && now.saturating_duration_since(self.last_draft) >= self.interval
    }

    /// `<drafts_dir>/<draft id>.json`
    pub fn draft_path(&self, drafts_dir: &Path) -> PathBuf {
        drafts_dir.join(format!("{}.json", self.draft_id))
    }

    pub fn mark_written(&mut self, now: Instant) {
        self.last_draft = now;
        self.drafts_written += 1;
    }
}
