//! Validation result shared by both sides of the boundary
//!
//! The engine produces it, the editor only reads it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of validating a plan
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A single finding with its location inside the plan
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ValidationIssue {
    /// Abstract code, e.g. `E102`
    pub code: String,
    pub message: String,
    /// Location path, e.g. `schedule[0].segments[1]`
    pub path: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Location/message pair as presented to the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueLocation {
    pub path: String,
    pub message: String,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// Group all findings (errors first, then warnings) by code
    pub fn by_code(&self) -> BTreeMap<String, Vec<IssueLocation>> {
        let mut grouped: BTreeMap<String, Vec<IssueLocation>> = BTreeMap::new();
        for issue in self.errors.iter().chain(self.warnings.iter()) {
            grouped
                .entry(issue.code.clone())
                .or_default()
                .push(IssueLocation {
                    path: issue.path.clone(),
                    message: issue.message.clone(),
                });
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(code: &str, path: &str) -> ValidationIssue {
        ValidationIssue {
            code: code.to_string(),
            message: format!("{} at {}", code, path),
            path: path.to_string(),
            field: None,
            hint: None,
        }
    }

    #[test]
    fn test_by_code_groups_locations() {
        let report = ValidationReport {
            errors: vec![
                issue("E102", "schedule[0].segments[0]"),
                issue("E102", "schedule[1].segments[2]"),
                issue("E103", "groups.legs"),
            ],
            warnings: vec![issue("W210", "schedule[2]")],
        };

        let grouped = report.by_code();
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped["E102"].len(), 2);
        assert_eq!(grouped["E102"][1].path, "schedule[1].segments[2]");
        assert_eq!(grouped["W210"][0].path, "schedule[2]");
        assert!(!report.is_valid());
        assert_eq!(report.issue_count(), 4);
    }

    #[test]
    fn test_optional_fields_may_be_omitted_on_the_wire() {
        let json = r#"{"errors":[{"code":"E101","message":"Missing exercise","path":"schedule[0].segments[0]"}],"warnings":[]}"#;
        let report: ValidationReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.errors[0].field, None);
        assert!(!report.is_valid());
    }
}
