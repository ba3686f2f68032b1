//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::{
    aspect::{Aspect, AspectRule},
    record::{AspectScope, PointRecord, RecordFilter, RecordView},
    school_class::SchoolClass,
    settings::SettingEntry,
    staff::Staff,
    student::Student,
};

/// Key/value settings rows
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// All rows ordered by key
    async fn list_settings(&self) -> Result<Vec<SettingEntry>>;

    async fn get_setting(&self, key: &str) -> Result<Option<SettingEntry>>;

    /// Insert or overwrite a single key
    async fn upsert_setting(&self, entry: &SettingEntry) -> Result<()>;

    /// Insert or overwrite several keys atomically
    async fn upsert_settings(&self, entries: &[SettingEntry]) -> Result<()>;
}

#[async_trait]
pub trait ClassStorage: Send + Sync {
    async fn store_class(&self, class: &SchoolClass) -> Result<()>;

    async fn get_class(&self, class_id: &str) -> Result<Option<SchoolClass>>;

    /// Ordered by grade, then name
    async fn list_classes(&self) -> Result<Vec<SchoolClass>>;

    async fn update_class(&self, class: &SchoolClass) -> Result<bool>;

    async fn delete_class(&self, class_id: &str) -> Result<bool>;

    async fn count_classes(&self) -> Result<u64>;
}

#[async_trait]
pub trait StudentStorage: Send + Sync {
    async fn store_student(&self, student: &Student) -> Result<()>;

    /// Insert many students in one transaction
    async fn store_students(&self, students: &[Student]) -> Result<()>;

    /// Includes the class name
    async fn get_student(&self, student_id: &str) -> Result<Option<Student>>;

    /// All students newest first, or one class ordered by name
    async fn list_students(&self, class_id: Option<&str>) -> Result<Vec<Student>>;

    async fn get_students_by_ids(&self, student_ids: &[String]) -> Result<Vec<Student>>;

    async fn update_student(&self, student: &Student) -> Result<bool>;

    async fn delete_student(&self, student_id: &str) -> Result<bool>;

    async fn delete_students(&self, student_ids: &[String]) -> Result<u64>;

    async fn count_students(&self, class_id: Option<&str>) -> Result<u64>;
}

#[async_trait]
pub trait AspectStorage: Send + Sync {
    async fn store_aspect(&self, aspect: &Aspect) -> Result<()>;

    /// Insert unless an aspect with the same name exists.
    /// Returns true when this call inserted the row.
    async fn store_aspect_if_absent(&self, aspect: &Aspect) -> Result<bool>;

    async fn get_aspect(&self, aspect_id: &str) -> Result<Option<Aspect>>;

    async fn find_aspect_by_name(&self, name: &str) -> Result<Option<Aspect>>;

    /// Ordered by name
    async fn list_aspects(&self) -> Result<Vec<Aspect>>;

    async fn update_aspect(&self, aspect: &Aspect) -> Result<bool>;

    /// Also removes the aspect's rules
    async fn delete_aspect(&self, aspect_id: &str) -> Result<bool>;

    async fn store_rule(&self, rule: &AspectRule) -> Result<()>;

    async fn get_rule(&self, rule_id: &str) -> Result<Option<AspectRule>>;

    /// Every rule, newest first
    async fn list_rules(&self) -> Result<Vec<AspectRule>>;

    async fn update_rule(&self, rule: &AspectRule) -> Result<bool>;

    async fn delete_rule(&self, rule_id: &str) -> Result<bool>;
}

/// Append-only point records
#[async_trait]
pub trait RecordStorage: Send + Sync {
    async fn store_record(&self, record: &PointRecord) -> Result<()>;

    /// Insert a batch in one transaction; either every row lands or none
    async fn store_records(&self, records: &[PointRecord]) -> Result<()>;

    /// Matching records, newest input date first
    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordView>>;

    /// Administrative bulk delete. Returns the number of rows removed.
    async fn delete_records(
        &self,
        scope: &AspectScope,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<u64>;
}

#[async_trait]
pub trait StaffStorage: Send + Sync {
    async fn store_staff(&self, staff: &Staff) -> Result<()>;

    /// Store the profile only while the staff table is empty. Returns
    /// whether it was stored.
    async fn store_first_staff(&self, staff: &Staff) -> Result<bool>;

    async fn get_staff(&self, staff_id: &str) -> Result<Option<Staff>>;

    /// Newest first
    async fn list_staff(&self) -> Result<Vec<Staff>>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories, so the domain layer can work
/// with any storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone + 'static {
    type SettingsRepository: SettingsStorage + Clone;
    type ClassRepository: ClassStorage + Clone;
    type StudentRepository: StudentStorage + Clone;
    type AspectRepository: AspectStorage + Clone;
    type RecordRepository: RecordStorage + Clone;
    type StaffRepository: StaffStorage + Clone;

    fn create_settings_repository(&self) -> Self::SettingsRepository;
    fn create_class_repository(&self) -> Self::ClassRepository;
    fn create_student_repository(&self) -> Self::StudentRepository;
    fn create_aspect_repository(&self) -> Self::AspectRepository;
    fn create_record_repository(&self) -> Self::RecordRepository;
    fn create_staff_repository(&self) -> Self::StaffRepository;
}
