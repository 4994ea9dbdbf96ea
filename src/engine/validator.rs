//! Plan validation
//!
//! Reports problems without changing the plan. Findings carry an abstract code
//! so the editor can group them, plus a path pointing at the offending value.

use crate::models::{Plan, Segment, ValidationIssue, ValidationReport};
use once_cell::sync::Lazy;
use regex::Regex;

/// Exercise codes look like `BB.SQ` or `BB.SQ.PAUSE`
static EXERCISE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z0-9_]+\.[A-Z0-9_]+(?:\.[A-Z0-9_]+)?$").expect("exercise code pattern")
});

/// Segment types that do not reference an exercise
const NON_EXERCISE_SEGMENTS: &[&str] = &["comment", "rest"];

/// Validation codes reported by the engine
pub mod codes {
    pub const MISSING_EXERCISE: &str = "E101";
    pub const UNKNOWN_EXERCISE: &str = "E102";
    pub const GROUP_UNKNOWN_EXERCISE: &str = "E103";
    pub const INVALID_EXERCISE_CODE: &str = "E105";
    pub const EMPTY_DAY: &str = "W200";
    pub const EMPTY_GROUP: &str = "W201";
}

#[derive(Default)]
pub struct PlanValidator;

impl PlanValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, plan: &Plan) -> ValidationReport {
        let mut report = ValidationReport::default();

        for code in plan.dictionary.keys() {
            if !EXERCISE_CODE.is_match(code) {
                report.errors.push(issue(
                    codes::INVALID_EXERCISE_CODE,
                    format!("Invalid exercise code format: {}", code),
                    format!("dictionary.{}", code),
                    Some("Use upper-case segments separated by dots, e.g. BB.SQ"),
                ));
            }
        }

        for (name, members) in &plan.groups {
            if members.is_empty() {
                report.warnings.push(issue(
                    codes::EMPTY_GROUP,
                    format!("Group '{}' has no exercises", name),
                    format!("groups.{}", name),
                    None,
                ));
            }
            for member in members {
                if !plan.dictionary.contains_key(member) {
                    report.errors.push(issue(
                        codes::GROUP_UNKNOWN_EXERCISE,
                        format!("Group '{}' references unknown exercise code '{}'", name, member),
                        format!("groups.{}", name),
                        None,
                    ));
                }
            }
        }

        for (day_index, day) in plan.schedule.iter().enumerate() {
            if day.segments.is_empty() {
                report.warnings.push(issue(
                    codes::EMPTY_DAY,
                    "Day has no segments".to_string(),
                    format!("schedule[{}]", day_index),
                    None,
                ));
            }
            for (segment_index, segment) in day.segments.iter().enumerate() {
                let path = format!("schedule[{}].segments[{}]", day_index, segment_index);
                self.validate_segment(plan, segment, path, &mut report);
            }
        }

        report
    }

    fn validate_segment(
        &self,
        plan: &Plan,
        segment: &Segment,
        path: String,
        report: &mut ValidationReport,
    ) {
        let kind = segment.0.get("type").and_then(|v| v.as_str());
        if kind.map_or(false, |k| NON_EXERCISE_SEGMENTS.contains(&k)) {
            return;
        }

        match segment.exercise() {
            None | Some("") => report.errors.push(issue(
                codes::MISSING_EXERCISE,
                "Missing exercise".to_string(),
                path,
                Some("Exercise code is required"),
            )),
            Some(code) if !plan.dictionary.contains_key(code) => report.errors.push(issue(
                codes::UNKNOWN_EXERCISE,
                format!("Unknown exercise: {}", code),
                path,
                Some("Add the exercise to the dictionary"),
            )),
            Some(_) => {}
        }
    }
}

fn issue(code: &str, message: String, path: String, hint: Option<&str>) -> ValidationIssue {
    ValidationIssue {
        code: code.to_string(),
        message,
        path,
        field: None,
        hint: hint.map(str::to_string),
    }
}
