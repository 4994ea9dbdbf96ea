//! Document outline
//!
//! A structural summary computed by the engine so the editor can answer
//! "how many days / segments" without parsing the document itself.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DocumentOutline {
    /// Segment count of each day, in schedule order
    pub segment_counts: Vec<usize>,
}

impl DocumentOutline {
    pub fn day_count(&self) -> usize {
        self.segment_counts.len()
    }

    /// Number of segments in `day`, or `None` if the day does not exist
    pub fn segment_count(&self, day: usize) -> Option<usize> {
        self.segment_counts.get(day).copied()
    }

    pub fn contains_day(&self, day: usize) -> bool {
        day < self.segment_counts.len()
    }

    pub fn contains_segment(&self, day: usize, segment: usize) -> bool {
        self.segment_count(day).map_or(false, |count| segment < count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_queries() {
        let outline = DocumentOutline {
            segment_counts: vec![2, 0],
        };
        assert_eq!(outline.day_count(), 2);
        assert!(outline.contains_segment(0, 1));
        assert!(!outline.contains_segment(0, 2));
        assert!(!outline.contains_segment(1, 0));
        assert!(!outline.contains_segment(5, 0));
        assert_eq!(outline.segment_count(3), None);
    }
}
