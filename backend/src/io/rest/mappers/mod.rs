//! Conversions between the `shared` DTOs and domain models and commands.

pub mod aspect_mapper;
pub mod class_mapper;
pub mod record_mapper;
pub mod settings_mapper;
pub mod staff_mapper;
pub mod student_mapper;

use chrono::NaiveDate;

use crate::domain::errors::PointError;

/// Parse a `YYYY-MM-DD` request field
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, PointError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        PointError::invalid(format!(
            "{} must be a date in YYYY-MM-DD format, got '{}'",
            field, value
        ))
    })
}

/// Optional date field; blank counts as absent
pub fn parse_optional_date(
    field: &str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, PointError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_date(field, value).map(Some),
        None => Ok(None),
    }
}

/// Forms send empty strings for unselected options
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
