//! Plan operations behind the C-ABI entry points
//!
//! Every operation is a pure function of its text arguments: parse the plan,
//! apply one change, return the canonical serialization of the result. No
//! state survives between calls.

use super::error::{EngineError, EngineResult};
use super::validator::PlanValidator;
use crate::models::{Day, DocumentOutline, Plan, Segment, DEFAULT_PLAN_NAME};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Message returned in the payload of a successful save
pub const SAVED_MESSAGE: &str = "Plan saved successfully";

// ============================================================================
// Helpers
// ============================================================================

fn parse<T: DeserializeOwned>(json: &str, what: &'static str) -> EngineResult<T> {
    serde_json::from_str(json).map_err(|e| EngineError::Parse {
        what,
        detail: e.to_string(),
    })
}

fn to_json<T: Serialize>(value: &T, what: &'static str) -> EngineResult<String> {
    serde_json::to_string(value).map_err(|e| EngineError::Serialize {
        what,
        detail: e.to_string(),
    })
}

fn parse_plan(plan_json: &str) -> EngineResult<Plan> {
    parse(plan_json, "plan")
}

/// Canonical form of a plan: compact JSON with ordered keys
fn canonical(plan: &Plan) -> EngineResult<String> {
    to_json(plan, "plan")
}

fn day_mut(plan: &mut Plan, day_index: usize) -> EngineResult<&mut Day> {
    plan.schedule
        .get_mut(day_index)
        .ok_or(EngineError::DayOutOfBounds(day_index))
}

fn check_segment(day: &Day, segment_index: usize) -> EngineResult<()> {
    if segment_index >= day.segments.len() {
        return Err(EngineError::SegmentOutOfBounds(segment_index));
    }
    Ok(())
}

// ============================================================================
// Document lifecycle
// ============================================================================

pub fn new_plan() -> EngineResult<String> {
    canonical(&Plan::new(DEFAULT_PLAN_NAME))
}

pub fn open_plan(path: &str) -> EngineResult<String> {
    let content = std::fs::read_to_string(Path::new(path))
        .map_err(|e| EngineError::Read(format!("{}: {}", path, e)))?;
    let plan = parse_plan(&content)?;
    canonical(&plan)
}

pub fn save_plan(plan_json: &str, path: &str) -> EngineResult<String> {
    let plan = parse_plan(plan_json)?;
    let pretty = serde_json::to_string_pretty(&plan).map_err(|e| EngineError::Serialize {
        what: "plan",
        detail: e.to_string(),
    })?;
    std::fs::write(Path::new(path), pretty)
        .map_err(|e| EngineError::Write(format!("{}: {}", path, e)))?;
    Ok(SAVED_MESSAGE.to_string())
}

pub fn validate_plan(plan_json: &str) -> EngineResult<String> {
    let plan = parse_plan(plan_json)?;
    let report = PlanValidator::new().validate(&plan);
    to_json(&report, "validation report")
}

pub fn plan_outline(plan_json: &str) -> EngineResult<String> {
    let plan = parse_plan(plan_json)?;
    let outline = DocumentOutline {
        segment_counts: plan.schedule.iter().map(|day| day.segments.len()).collect(),
    };
    to_json(&outline, "outline")
}

// ============================================================================
// Segment operations
// ============================================================================

pub fn add_segment(plan_json: &str, day_index: usize, segment_json: &str) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    let segment: Segment = parse(segment_json, "segment")?;
    day_mut(&mut plan, day_index)?.segments.push(segment);
    canonical(&plan)
}

pub fn remove_segment(plan_json: &str, day_index: usize, segment_index: usize) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    let day = day_mut(&mut plan, day_index)?;
    check_segment(day, segment_index)?;
    day.segments.remove(segment_index);
    canonical(&plan)
}

pub fn update_segment(
    plan_json: &str,
    day_index: usize,
    segment_index: usize,
    segment_json: &str,
) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    let segment: Segment = parse(segment_json, "segment")?;
    let day = day_mut(&mut plan, day_index)?;
    check_segment(day, segment_index)?;
    day.segments[segment_index] = segment;
    canonical(&plan)
}

/// Move a segment `offset` places within its day (-1 is up, +1 is down)
pub fn move_segment(plan_json: &str, day_index: usize, segment_index: usize, offset: i32) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    let day = day_mut(&mut plan, day_index)?;
    check_segment(day, segment_index)?;

    let target = segment_index as i64 + i64::from(offset);
    if target < 0 || target >= day.segments.len() as i64 {
        return Err(EngineError::InvalidMove {
            segment: segment_index,
            offset,
        });
    }

    let segment = day.segments.remove(segment_index);
    day.segments.insert(target as usize, segment);
    canonical(&plan)
}

// ============================================================================
// Day operations
// ============================================================================

pub fn add_day(plan_json: &str, day_json: &str) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    let day: Day = parse(day_json, "day")?;
    plan.schedule.push(day);
    canonical(&plan)
}

pub fn remove_day(plan_json: &str, day_index: usize) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    if day_index >= plan.schedule.len() {
        return Err(EngineError::DayOutOfBounds(day_index));
    }
    plan.schedule.remove(day_index);
    canonical(&plan)
}

/// Merge `attributes_json` into a day's attributes; a `null` value removes
/// the key. Segments are edited through the segment operations only.
pub fn update_day(plan_json: &str, day_index: usize, attributes_json: &str) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    let attributes: Map<String, Value> = parse(attributes_json, "day attributes")?;
    if attributes.contains_key("segments") {
        return Err(EngineError::Parse {
            what: "day attributes",
            detail: "segments cannot be set through a day update".to_string(),
        });
    }

    let day = day_mut(&mut plan, day_index)?;
    for (key, value) in attributes {
        if value.is_null() {
            day.attributes.remove(&key);
        } else {
            day.attributes.insert(key, value);
        }
    }
    canonical(&plan)
}

// ============================================================================
// Exercise groups and dictionary
// ============================================================================

pub fn get_groups(plan_json: &str) -> EngineResult<String> {
    let plan = parse_plan(plan_json)?;
    to_json(&plan.groups, "groups")
}

/// Insert or replace the group `group_name`
pub fn upsert_group(plan_json: &str, group_name: &str, exercises_json: &str) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    let exercises: Vec<String> = parse(exercises_json, "exercises")?;
    plan.groups.insert(group_name.to_string(), exercises);
    canonical(&plan)
}

/// Removing a group that does not exist leaves the plan as it was
pub fn remove_group(plan_json: &str, group_name: &str) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    plan.groups.remove(group_name);
    canonical(&plan)
}

pub fn add_dictionary_entry(plan_json: &str, code: &str, name: &str) -> EngineResult<String> {
    let mut plan = parse_plan(plan_json)?;
    plan.dictionary.insert(code.to_string(), name.to_string());
    canonical(&plan)
}
