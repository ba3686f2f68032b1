//! Domain models for the key/value settings store and the attendance
//! policy resolved from it.
use serde::{Deserialize, Serialize};

use crate::domain::lateness::ClockTime;

pub const SCHOOL_START_TIME_KEY: &str = "school_start_time";
pub const LATE_PENALTY_MINUTES_KEY: &str = "late_penalty_minutes";
pub const LATE_PENALTY_POINTS_KEY: &str = "late_penalty_points";

pub const DEFAULT_SCHOOL_START_TIME: ClockTime = ClockTime::new(7, 30);
pub const DEFAULT_LATE_PENALTY_MINUTES: i64 = 5;
pub const DEFAULT_LATE_PENALTY_POINTS: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

/// Attendance policy with defaults applied for absent keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchoolSettings {
    pub school_start_time: ClockTime,
    pub late_penalty_minutes: i64,
    pub late_penalty_points: i64,
}

impl Default for SchoolSettings {
    fn default() -> Self {
        Self {
            school_start_time: DEFAULT_SCHOOL_START_TIME,
            late_penalty_minutes: DEFAULT_LATE_PENALTY_MINUTES,
            late_penalty_points: DEFAULT_LATE_PENALTY_POINTS,
        }
    }
}
