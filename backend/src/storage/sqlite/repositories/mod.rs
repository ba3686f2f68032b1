pub mod aspect_repository;
pub mod class_repository;
pub mod record_repository;
pub mod settings_repository;
pub mod staff_repository;
pub mod student_repository;

pub use aspect_repository::AspectRepository;
pub use class_repository::ClassRepository;
pub use record_repository::RecordRepository;
pub use settings_repository::SettingsRepository;
pub use staff_repository::StaffRepository;
pub use student_repository::StudentRepository;

use std::str::FromStr;

/// Parse an enum stored as text, naming the column when the value is unknown
pub(crate) fn parse_column<T>(column: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("Bad value in column {}: {}", column, e))
}

/// Dates are stored as `YYYY-MM-DD` text
pub(crate) fn parse_date(value: &str) -> anyhow::Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Bad stored date '{}': {}", value, e))
}

/// `?, ?, ?` for an IN clause with `n` binds
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
