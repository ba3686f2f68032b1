//! Domain models for point records.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Polarity;

/// One scored event. Written once, never updated.
///
/// `class_id` is copied from the student at insertion time and is not
/// rewritten if the student later changes class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: String,
    pub student_id: String,
    pub class_id: Option<String>,
    pub aspect_id: Option<String>,
    pub rule_id: Option<String>,
    pub point: i64,
    pub input_date: NaiveDate,
    pub note: Option<String>,
    pub input_by: Option<String>,
    pub created_at: String, // RFC 3339 timestamp
}

/// A record joined with the names of everything it references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_nisn: Option<String>,
    pub class_id: Option<String>,
    pub class_name: Option<String>,
    pub aspect_id: Option<String>,
    pub aspect_name: Option<String>,
    pub aspect_polarity: Option<Polarity>,
    pub rule_id: Option<String>,
    pub rule_name: Option<String>,
    pub point: i64,
    pub input_date: NaiveDate,
    pub note: Option<String>,
    pub input_by: Option<String>,
    pub created_at: String,
}

/// Filter applied when reading records. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub class_id: Option<String>,
    pub polarity: Option<Polarity>,
}

/// Which aspects a bulk delete touches
#[derive(Debug, Clone, PartialEq)]
pub enum AspectScope {
    All,
    Only(String),
    /// Everything except the given aspect; `None` excludes nothing
    Except(Option<String>),
}
