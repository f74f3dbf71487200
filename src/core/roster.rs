//! Students, instructors and the classes they meet in.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::taxonomy::{Apparatus, ClassType, Level};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Booking-platform member id, stored verbatim.
    pub external_id: Option<String>,
    pub created_at: String,
}

/// An apparatus an instructor teaches and the highest level they take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApparatusLevel {
    pub apparatus: Apparatus,
    pub level: Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub external_id: Option<String>,
    pub apparatus_levels: Vec<ApparatusLevel>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub name: String,
    pub class_type: ClassType,
    pub apparatus: Apparatus,
    pub level: Level,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    /// Booking-platform class id. Opaque; never parsed as a number.
    pub external_id: Option<String>,
    pub instructor_id: String,
    pub created_at: String,
}

/// A class with its instructor and enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDetail {
    #[serde(flatten)]
    pub class: Class,
    pub instructor: Instructor,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstructor {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub external_id: Option<String>,
    pub apparatus_levels: Vec<ApparatusLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub class_type: ClassType,
    pub apparatus: Apparatus,
    pub level: Level,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub external_id: Option<String>,
    pub instructor_id: String,
    /// Students to enroll; every id must exist.
    pub student_ids: Vec<String>,
}

/// Decode a stored apparatus-level list.
///
/// Accepts a JSON array or a JSON string holding one. Entries that are not
/// `{apparatus, level}` objects with known values are dropped; this never fails.
#[must_use]
pub fn parse_apparatus_levels(raw: Option<&str>) -> Vec<ApparatusLevel> {
    let Some(text) = raw else {
        return Vec::new();
    };
    let value = match serde_json::from_str::<Value>(text) {
        Ok(Value::String(inner)) => serde_json::from_str::<Value>(&inner).unwrap_or(Value::Null),
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unparseable apparatus levels");
            return Vec::new();
        }
    };
    let Value::Array(entries) = value else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<ApparatusLevel>(entry).ok())
        .collect()
}

/// Canonical stored form of an apparatus-level list.
#[must_use]
pub fn encode_apparatus_levels(levels: &[ApparatusLevel]) -> String {
    serde_json::to_string(levels).unwrap_or_else(|_| "[]".to_string())
}
