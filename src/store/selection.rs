//! Selection and focus annotations
//!
//! UI-only state held next to the document, never inside it. Indices refer to
//! the current document and are re-checked against its outline every time the
//! document is replaced; anything out of range is cleared, not clamped.

use crate::models::DocumentOutline;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which level of the schedule keyboard focus is on
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FocusMode {
    #[default]
    Day,
    Segment,
}

/// Position of one segment in the schedule
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentRef {
    pub day: usize,
    pub segment: usize,
}

impl SegmentRef {
    pub fn new(day: usize, segment: usize) -> Self {
        Self { day, segment }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    focused_day: Option<usize>,
    focused_segment: Option<SegmentRef>,
    focus_mode: FocusMode,
    /// Multi-selection, kept sorted
    selected: BTreeSet<SegmentRef>,
    /// Origin for range selection
    anchor: Option<SegmentRef>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused_day(&self) -> Option<usize> {
        self.focused_day
    }

    pub fn focused_segment(&self) -> Option<SegmentRef> {
        self.focused_segment
    }

    pub fn focus_mode(&self) -> FocusMode {
        self.focus_mode
    }

    pub fn set_focus_mode(&mut self, mode: FocusMode) {
        self.focus_mode = mode;
    }

    /// Focus a day; segment focus is dropped if it was on another day
    pub fn focus_day(&mut self, day: usize) {
        self.focused_day = Some(day);
        self.focus_mode = FocusMode::Day;
        if self.focused_segment.map_or(false, |s| s.day != day) {
            self.focused_segment = None;
        }
    }

    pub fn focus_segment(&mut self, target: SegmentRef) {
        self.focused_day = Some(target.day);
        self.focused_segment = Some(target);
        self.focus_mode = FocusMode::Segment;
    }

    pub fn selected(&self) -> impl Iterator<Item = SegmentRef> + '_ {
        self.selected.iter().copied()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, target: SegmentRef) -> bool {
        self.selected.contains(&target)
    }

    /// Plain click: select only `target`
    pub fn select_exclusive(&mut self, target: SegmentRef) {
        self.selected.clear();
        self.selected.insert(target);
        self.anchor = Some(target);
        self.focus_segment(target);
    }

    /// Modifier click: flip membership of `target`
    pub fn toggle(&mut self, target: SegmentRef) {
        if !self.selected.remove(&target) {
            self.selected.insert(target);
        }
        self.anchor = Some(target);
        self.focus_segment(target);
    }

    /// Shift click: select from the anchor to `target`
    ///
    /// Ranges never span days; without an anchor on the same day this
    /// behaves like [`Selection::select_exclusive`].
    pub fn select_range(&mut self, target: SegmentRef) {
        let anchor = match self.anchor {
            Some(anchor) if anchor.day == target.day => anchor,
            _ => return self.select_exclusive(target),
        };

        let (low, high) = if anchor.segment <= target.segment {
            (anchor.segment, target.segment)
        } else {
            (target.segment, anchor.segment)
        };
        self.selected.clear();
        self.selected
            .extend((low..=high).map(|segment| SegmentRef::new(target.day, segment)));
        self.focus_segment(target);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Reset all annotations
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drop every index that no longer exists in `outline`
    pub fn revalidate(&mut self, outline: &DocumentOutline) {
        if self.focused_day.map_or(false, |day| !outline.contains_day(day)) {
            self.focused_day = None;
        }
        if self
            .focused_segment
            .map_or(false, |s| !outline.contains_segment(s.day, s.segment))
        {
            self.focused_segment = None;
        }
        if self.focused_segment.is_none() && self.focus_mode == FocusMode::Segment {
            self.focus_mode = FocusMode::Day;
        }
        if self
            .anchor
            .map_or(false, |a| !outline.contains_segment(a.day, a.segment))
        {
            self.anchor = None;
        }
        self.selected
            .retain(|s| outline.contains_segment(s.day, s.segment));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(counts: &[usize]) -> DocumentOutline {
        DocumentOutline {
            segment_counts: counts.to_vec(),
        }
    }

    #[test]
    fn test_select_exclusive_replaces_selection() {
        let mut sel = Selection::new();
        sel.select_exclusive(SegmentRef::new(0, 1));
        sel.select_exclusive(SegmentRef::new(0, 2));
        assert_eq!(sel.selected().collect::<Vec<_>>(), vec![SegmentRef::new(0, 2)]);
        assert_eq!(sel.focus_mode(), FocusMode::Segment);
        assert_eq!(sel.focused_day(), Some(0));
    }

    #[test]
    fn test_toggle() {
        let mut sel = Selection::new();
        sel.toggle(SegmentRef::new(0, 0));
        sel.toggle(SegmentRef::new(1, 3));
        assert_eq!(sel.selected_count(), 2);
        sel.toggle(SegmentRef::new(0, 0));
        assert!(!sel.is_selected(SegmentRef::new(0, 0)));
        assert!(sel.is_selected(SegmentRef::new(1, 3)));
    }

    #[test]
    fn test_range_within_day() {
        let mut sel = Selection::new();
        sel.select_exclusive(SegmentRef::new(2, 4));
        sel.select_range(SegmentRef::new(2, 1));
        let picked: Vec<usize> = sel.selected().map(|s| s.segment).collect();
        assert_eq!(picked, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_range_across_days_selects_only_target() {
        let mut sel = Selection::new();
        sel.select_exclusive(SegmentRef::new(0, 0));
        sel.select_range(SegmentRef::new(1, 2));
        assert_eq!(sel.selected().collect::<Vec<_>>(), vec![SegmentRef::new(1, 2)]);
    }

    #[test]
    fn test_focus_day_drops_segment_on_other_day() {
        let mut sel = Selection::new();
        sel.focus_segment(SegmentRef::new(0, 1));
        sel.focus_day(0);
        assert_eq!(sel.focused_segment(), Some(SegmentRef::new(0, 1)));
        sel.focus_day(1);
        assert_eq!(sel.focused_segment(), None);
        assert_eq!(sel.focus_mode(), FocusMode::Day);
    }

    #[test]
    fn test_revalidate_clears_out_of_range() {
        let mut sel = Selection::new();
        sel.toggle(SegmentRef::new(0, 0));
        sel.toggle(SegmentRef::new(0, 1));
        sel.toggle(SegmentRef::new(1, 0));

        sel.revalidate(&outline(&[1]));

        assert_eq!(sel.selected().collect::<Vec<_>>(), vec![SegmentRef::new(0, 0)]);
        assert_eq!(sel.focused_segment(), None);
        assert_eq!(sel.focused_day(), None);
        assert_eq!(sel.focus_mode(), FocusMode::Day);
    }

    #[test]
    fn test_revalidate_keeps_valid_focus() {
        let mut sel = Selection::new();
        sel.focus_segment(SegmentRef::new(1, 0));
        sel.revalidate(&outline(&[0, 1]));
        assert_eq!(sel.focused_segment(), Some(SegmentRef::new(1, 0)));
        assert_eq!(sel.focus_mode(), FocusMode::Segment);
    }
}
