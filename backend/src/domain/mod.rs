//! # Domain Module
//!
//! Business logic for the school point tracker.
//!
//! ## Module Organization
//!
//! - **lateness**: pure lateness calculator (start time + arrival → penalty)
//! - **aggregation**: grouping and ranking of records for the dashboard
//! - **settings_service**: settings resolver and settings administration
//! - **record_service**: the point record writer and the scan / batch flows
//!   built on it
//! - **class_service**, **student_service**, **aspect_service**,
//!   **staff_service**: master data
//! - **report_service** and **export**: filtered record listings, CSV/PDF
//!   export and administrative bulk delete
//! - **dashboard_service**: role-scoped dashboard statistics
//!
//! ## Business Rules
//!
//! - A record's point comes either from a rule's fixed point or from the
//!   lateness calculator, never both
//! - A record copies the student's class at the moment it is written
//! - Records are append-only; only the administrative bulk delete removes them
//! - Attendance policy is re-read from storage for every attendance event
//!
//! Services are generic over a storage [`Connection`](crate::storage::Connection)
//! and return `anyhow::Result`, raising [`errors::PointError`] for failures
//! the caller must be able to tell apart.

use chrono::{Local, NaiveDate, SecondsFormat, Utc};

pub mod aggregation;
pub mod aspect_service;
pub mod class_service;
pub mod commands;
pub mod dashboard_service;
pub mod errors;
pub mod export;
pub mod lateness;
pub mod models;
pub mod record_service;
pub mod report_service;
pub mod settings_service;
pub mod staff_service;
pub mod student_service;

/// RFC 3339 timestamp with fixed-width fractional seconds, so stored values
/// sort chronologically as text
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Trimmed display name, 1 to 100 characters
pub(crate) fn validate_name(label: &str, name: &str) -> Result<String, errors::PointError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(errors::PointError::invalid(format!("{} name cannot be empty", label)));
    }
    if name.chars().count() > 100 {
        return Err(errors::PointError::invalid(format!(
            "{} name cannot exceed 100 characters",
            label
        )));
    }
    Ok(name.to_string())
}
