//! Engine-side plan model
//!
//! Only the native engine deserializes plans. Maps are ordered so that the
//! canonical (compact) serialization of a plan is deterministic, which is what
//! lets snapshots be compared byte for byte.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Name given to plans created from scratch
pub const DEFAULT_PLAN_NAME: &str = "New Plan";

/// Top-level training plan
///
/// Only the fields the engine edits or validates are modelled; everything
/// else in the document survives in `extra`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Plan {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default)]
    pub unit: Unit,

    /// Exercise code -> display name
    #[serde(default)]
    pub dictionary: BTreeMap<String, String>,

    /// Group name -> ordered exercise codes
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub schedule: Vec<Day>,

    /// Top-level fields the engine does not interpret (`phase`, `warmup`,
    /// `progression`, ...); carried through every edit unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Plan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: None,
            unit: Unit::default(),
            dictionary: BTreeMap::new(),
            groups: BTreeMap::new(),
            schedule: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new(DEFAULT_PLAN_NAME)
    }
}

/// Load unit for the whole plan
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kg,
    Lb,
    Bw,
}

/// One training day
///
/// Besides its segments a day carries free-form attributes (`name`, `label`,
/// `goal`, ...) that the engine stores without interpreting.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Day {
    #[serde(default)]
    pub segments: Vec<Segment>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A single block of work inside a day, kept as a JSON object
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Segment(pub Map<String, Value>);

impl Segment {
    /// Exercise code this segment refers to, if any
    pub fn exercise(&self) -> Option<&str> {
        self.0
            .get("exercise")
            .or_else(|| self.0.get("ex"))
            .and_then(Value::as_str)
    }
}
