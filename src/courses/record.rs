//! Course record type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single course document.
///
/// The index owns these documents, so every attribute except `id` may be
/// missing from a stored record. Missing values never satisfy a filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    /// Unique document id
    pub id: String,
    /// Course title
    #[serde(default)]
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Category, e.g. "Art" or "Science"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Course type, e.g. "ONE_TIME", "COURSE", "CLUB"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub course_type: Option<String>,
    /// Youngest age the course is meant for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i32>,
    /// Oldest age the course is meant for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,
    /// Price per enrolment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Start of the next scheduled session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_session_date: Option<DateTime<Utc>>,
    /// Attributes the search core never looks at
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CourseRecord {
    /// Create a fully populated record with empty extra attributes
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        course_type: impl Into<String>,
        min_age: i32,
        max_age: i32,
        price: f64,
        next_session_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: Some(category.into()),
            course_type: Some(course_type.into()),
            min_age: Some(min_age),
            max_age: Some(max_age),
            price: Some(price),
            next_session_date: Some(next_session_date),
            extra: Map::new(),
        }
    }
}
