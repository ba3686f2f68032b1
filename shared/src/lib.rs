use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Polarity of an aspect: whether its rules add to or subtract from a
/// student's standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Achievements (adds points)
    Positive,
    /// Violations (subtracts points)
    Negative,
    /// Recorded for information only
    Neutral,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
            Polarity::Neutral => "neutral",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Polarity::Positive),
            "negative" => Ok(Polarity::Negative),
            "neutral" => Ok(Polarity::Neutral),
            other => Err(format!("Unknown polarity: {}", other)),
        }
    }
}

/// How records for an aspect are usually captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMethod {
    Manual,
    Qr,
    Select,
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputMethod::Manual => "manual",
            InputMethod::Qr => "qr",
            InputMethod::Select => "select",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for InputMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(InputMethod::Manual),
            "qr" => Ok(InputMethod::Qr),
            "select" => Ok(InputMethod::Select),
            other => Err(format!("Unknown input method: {}", other)),
        }
    }
}

/// Role of a staff member, used to scope dashboards and guard
/// administrative operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Full access
    Admin,
    /// Principal ("kepala sekolah")
    Kepsek,
    /// Homeroom teacher ("wali kelas"), scoped to one class
    Walas,
    /// Records points through the manual form
    PetugasInput,
    /// Operates the attendance scanner
    PetugasScan,
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StaffRole::Admin => "admin",
            StaffRole::Kepsek => "kepsek",
            StaffRole::Walas => "walas",
            StaffRole::PetugasInput => "petugas_input",
            StaffRole::PetugasScan => "petugas_scan",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(StaffRole::Admin),
            "kepsek" => Ok(StaffRole::Kepsek),
            "walas" => Ok(StaffRole::Walas),
            "petugas_input" => Ok(StaffRole::PetugasInput),
            "petugas_scan" => Ok(StaffRole::PetugasScan),
            other => Err(format!("Unknown staff role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "L")]
    Male,
    #[serde(rename = "P")]
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "L"),
            Gender::Female => write!(f, "P"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Gender::Male),
            "P" => Ok(Gender::Female),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// Standard error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Classes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: String,
    pub name: String,
    /// Grade level label, e.g. "X", "XI"
    pub grade: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateClassRequest {
    pub name: String,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassListResponse {
    pub classes: Vec<SchoolClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassResponse {
    pub class: SchoolClass,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Opaque id; also the token encoded in the student's QR card
    pub id: String,
    /// National student number
    pub nisn: Option<String>,
    pub name: String,
    pub gender: Option<Gender>,
    pub class_id: Option<String>,
    /// Denormalized for display
    pub class_name: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub nisn: Option<String>,
    pub name: String,
    pub class_id: Option<String>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub nisn: Option<String>,
    pub name: String,
    pub class_id: Option<String>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportStudentsRequest {
    pub students: Vec<CreateStudentRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDeleteStudentsRequest {
    pub student_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StudentListQuery {
    /// Restrict to one class (ordered by name when set)
    pub class_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub student: Student,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkStudentsResponse {
    pub affected_count: usize,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Aspects and rules
// ---------------------------------------------------------------------------

/// A named, fixed-point behavior under an aspect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRule {
    pub id: String,
    pub aspect_id: String,
    pub name: String,
    pub point: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub id: String,
    pub name: String,
    pub polarity: Polarity,
    pub input_method: InputMethod,
    pub active: bool,
    /// Rules, newest first
    pub rules: Vec<AspectRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAspectRequest {
    pub name: String,
    pub polarity: Polarity,
    pub input_method: InputMethod,
    /// Optional rule created together with the aspect
    pub rule_name: Option<String>,
    pub rule_point: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAspectRequest {
    pub name: String,
    pub polarity: Polarity,
    pub input_method: InputMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    pub point: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRuleRequest {
    pub name: String,
    pub point: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectListResponse {
    pub aspects: Vec<Aspect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectResponse {
    pub aspect: Aspect,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResponse {
    pub rule: AspectRule,
    pub success_message: String,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// A raw key/value settings row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingListResponse {
    pub settings: Vec<Setting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub settings: BTreeMap<String, String>,
}

/// Attendance policy after defaults have been applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSettingsResponse {
    /// `HH:MM`, 24-hour clock
    pub school_start_time: String,
    pub late_penalty_minutes: i64,
    pub late_penalty_points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// A scan from the QR reader or the manual token form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Student token (the student id)
    pub token: String,
    pub aspect_id: Option<String>,
    pub rule_id: Option<String>,
    /// `YYYY-MM-DD`; defaults to today
    pub date: Option<String>,
    /// `HH:MM`; defaults to the current wall-clock time
    pub arrival_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    pub record_id: String,
    pub student_name: String,
    pub class_name: Option<String>,
    pub arrival_time: String,
    pub is_late: bool,
    pub late_minutes: i64,
    pub point: i64,
}

/// Manual form: one rule applied to many students
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordsRequest {
    pub student_ids: Vec<String>,
    pub aspect_id: Option<String>,
    pub rule_id: Option<String>,
    /// `YYYY-MM-DD`; defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordsResponse {
    pub success: bool,
    pub count: usize,
    /// Students that were not found or have no class
    pub skipped_student_ids: Vec<String>,
}

/// A point record joined with the names needed for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
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
    /// `YYYY-MM-DD`
    pub input_date: String,
    pub note: Option<String>,
    pub input_by: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecordsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub class_id: Option<String>,
    #[serde(rename = "type")]
    pub polarity: Option<Polarity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordListResponse {
    pub records: Vec<PointRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteRecordsKind {
    All,
    Attendance,
    Violations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordsRequest {
    pub kind: DeleteRecordsKind,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordsResponse {
    pub success: bool,
    pub deleted_count: u64,
}

// ---------------------------------------------------------------------------
// Lateness preview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatenessRequest {
    pub start_time: String,
    pub arrival_time: String,
    pub interval_minutes: i64,
    pub penalty_per_interval: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatenessResponse {
    pub is_late: bool,
    pub late_minutes: i64,
    pub point: i64,
    pub note: String,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// One row of a ranking list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTotal {
    pub name: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardStats {
    pub total_students: u64,
    pub total_classes: u64,
    /// Number of positive records dated today
    pub points_today: u64,
    /// Number of negative records dated today
    pub negative_points_today: u64,
    pub top_classes_positive: Option<Vec<RankedTotal>>,
    pub top_classes_negative: Option<Vec<RankedTotal>>,
    pub violation_by_aspect: Option<Vec<RankedTotal>>,
    pub top_students_positive: Option<Vec<RankedTotal>>,
    pub top_students_negative: Option<Vec<RankedTotal>>,
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
    /// Homeroom class for `walas`
    pub class_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    pub role: StaffRole,
    pub class_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffListResponse {
    pub staff: Vec<Staff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffResponse {
    pub staff: Staff,
    pub success_message: String,
}
