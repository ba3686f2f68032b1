//! Domain-level command and query types.
//!
//! Services take these instead of the public DTOs in `shared`; the REST layer
//! maps requests onto them (parsing dates and times on the way in).

pub mod recording {
    use chrono::NaiveDate;

    use crate::domain::lateness::ClockTime;

    /// Everything the record writer needs for one row
    #[derive(Debug, Clone)]
    pub struct RecordPointCommand {
        pub student_id: String,
        pub point: i64,
        /// `None` files the record under the attendance aspect
        pub aspect_id: Option<String>,
        pub rule_id: Option<String>,
        pub input_date: NaiveDate,
        pub note: Option<String>,
        pub input_by: Option<String>,
    }

    /// A scan from the QR reader or the manual token form
    #[derive(Debug, Clone, Default)]
    pub struct ScanCommand {
        pub token: String,
        pub aspect_id: Option<String>,
        pub rule_id: Option<String>,
        /// Defaults to today
        pub input_date: Option<NaiveDate>,
        /// Defaults to the current wall-clock time
        pub arrival_time: Option<ClockTime>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct ScanResult {
        pub record_id: String,
        pub student_name: String,
        pub class_name: Option<String>,
        pub arrival_time: ClockTime,
        pub is_late: bool,
        pub late_minutes: i64,
        pub point: i64,
    }

    /// One rule applied to many students
    #[derive(Debug, Clone, Default)]
    pub struct CreateRecordsCommand {
        pub student_ids: Vec<String>,
        pub aspect_id: Option<String>,
        pub rule_id: Option<String>,
        pub input_date: Option<NaiveDate>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct CreateRecordsResult {
        pub count: usize,
        pub skipped_student_ids: Vec<String>,
    }
}

pub mod classes {
    #[derive(Debug, Clone)]
    pub struct ClassCommand {
        pub name: String,
        pub grade: Option<String>,
    }
}

pub mod students {
    use shared::Gender;

    /// Used for create, update and each row of an import
    #[derive(Debug, Clone)]
    pub struct StudentCommand {
        pub nisn: Option<String>,
        pub name: String,
        pub class_id: Option<String>,
        pub gender: Option<Gender>,
    }
}

pub mod aspects {
    use shared::{InputMethod, Polarity};

    #[derive(Debug, Clone)]
    pub struct AspectCommand {
        pub name: String,
        pub polarity: Polarity,
        pub input_method: InputMethod,
    }

    #[derive(Debug, Clone)]
    pub struct RuleCommand {
        pub name: String,
        pub point: i64,
    }
}

pub mod staff {
    use shared::StaffRole;

    #[derive(Debug, Clone)]
    pub struct CreateStaffCommand {
        pub name: String,
        pub role: StaffRole,
        pub class_id: Option<String>,
    }
}

pub mod reports {
    use chrono::NaiveDate;

    /// Which records an administrative bulk delete removes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum DeleteKind {
        All,
        /// Records of the attendance aspect
        Attendance,
        /// Everything except attendance
        Violations,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteRecordsCommand {
        pub kind: DeleteKind,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
    }
}
