//! Student documents as stored by the document database, and their mapping to
//! lesson definitions.
//!
//! Stored documents are loose: any field may be missing or null, and
//! `duration` shows up as a number or as a numeric string depending on which
//! form wrote it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::lesson::LessonDefinition;

/// Name given to a student document without one.
pub const UNNAMED_STUDENT: &str = "Unnamed student";

/// Authentication principal that owns a set of student documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The stored shape of a student document (without its id).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instrument: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub visit_time: Option<String>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
}

/// A student document together with its document id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    #[serde(flatten)]
    pub document: StudentDocument,
}

impl StudentDocument {
    /// Map this document to the lesson definition the calendar works from.
    pub fn to_definition(&self, id: &str) -> LessonDefinition {
        LessonDefinition {
            id: id.to_string(),
            name: non_empty(self.name.as_deref())
                .unwrap_or(UNNAMED_STUDENT)
                .to_string(),
            instrument: self.instrument.clone().unwrap_or_default(),
            day: self.day.clone().unwrap_or_default(),
            visit_time: self.visit_time.clone().unwrap_or_default(),
            duration: duration_minutes(self.duration.as_ref()),
        }
    }

    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        self.owner_id.as_ref() == Some(owner)
    }
}

impl StudentRecord {
    pub fn to_definition(&self) -> LessonDefinition {
        self.document.to_definition(&self.id)
    }
}

/// Parse a JSON array of student records (`{"id": .., "name": .., ...}`).
///
/// # Errors
/// Returns `ScheduleError::Snapshot` if the input is not an array of records.
pub fn parse_snapshot(json: &str) -> Result<Vec<StudentRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Lesson definitions for the records `owner` can see, in snapshot order.
///
/// With no owner every record is visible.
pub fn definitions_for_owner(
    records: &[StudentRecord],
    owner: Option<&OwnerId>,
) -> Vec<LessonDefinition> {
    records
        .iter()
        .filter(|r| owner.is_none_or(|o| r.document.is_owned_by(o)))
        .map(StudentRecord::to_definition)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Read a stored duration as whole positive minutes.
///
/// Fractional values are truncated; anything non-positive or non-numeric is
/// treated as absent.
fn duration_minutes(value: Option<&Value>) -> Option<i64> {
    let minutes = match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)?,
        _ => return None,
    };
    (minutes > 0).then_some(minutes)
}
