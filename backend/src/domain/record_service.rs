//! # Point Record Writer
//!
//! Every scored event ends up in [`RecordService::record_point`] (or the
//! batch variant used by the manual form). The writer copies the student's
//! current class onto the row and never updates an existing record.
//!
//! Two flows sit on top of it:
//!
//! - **scan**: a student token from the QR reader. With an aspect and rule
//!   selected the rule's fixed point is used; otherwise the attendance
//!   policy is resolved and the lateness calculator decides the point.
//! - **batch**: one rule applied to many students in a single transaction.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use tracing::{info, warn};

use crate::domain::commands::recording::{
    CreateRecordsCommand, CreateRecordsResult, RecordPointCommand, ScanCommand, ScanResult,
};
use crate::domain::errors::PointError;
use crate::domain::lateness::{calculate_lateness, ClockTime};
use crate::domain::models::aspect::{Aspect, AspectRule, ATTENDANCE_ASPECT_NAME};
use crate::domain::models::record::PointRecord;
use crate::domain::models::staff::Staff;
use crate::domain::models::student::Student;
use crate::domain::settings_service::SettingsService;
use crate::domain::{timestamp_now, today};
use crate::storage::{AspectStorage, Connection, RecordStorage, StudentStorage};

#[derive(Clone)]
pub struct RecordService<C: Connection> {
    settings_service: SettingsService<C>,
    student_repository: C::StudentRepository,
    aspect_repository: C::AspectRepository,
    record_repository: C::RecordRepository,
}

impl<C: Connection> RecordService<C> {
    pub fn new(connection: Arc<C>, settings_service: SettingsService<C>) -> Self {
        Self {
            settings_service,
            student_repository: connection.create_student_repository(),
            aspect_repository: connection.create_aspect_repository(),
            record_repository: connection.create_record_repository(),
        }
    }

    /// Persist exactly one record for an existing student.
    ///
    /// Without an aspect the record is filed under the attendance aspect,
    /// which is created on first use.
    pub async fn record_point(&self, command: RecordPointCommand) -> Result<PointRecord> {
        let student = self.require_student(&command.student_id).await?;
        self.write_record(&student, command).await
    }

    /// Handle one scan from the reader or the token form
    pub async fn record_scan(&self, actor: &Staff, command: ScanCommand) -> Result<ScanResult> {
        let token = command.token.trim();
        info!("Scan of token '{}' by {}", token, actor.id);
        if token.is_empty() {
            return Err(PointError::invalid("Student token cannot be empty").into());
        }

        let student = self.require_student(token).await?;

        let now = Local::now().naive_local();
        let input_date = command.input_date.unwrap_or_else(|| now.date());
        let arrival_time = command
            .arrival_time
            .unwrap_or_else(|| ClockTime::from_naive_time(now.time()));

        let (point, aspect_id, rule_id, note, is_late, late_minutes) =
            match (command.aspect_id.as_deref(), command.rule_id.as_deref()) {
                (Some(aspect_id), Some(rule_id)) => {
                    let (aspect, rule) = self.require_rule_of_aspect(aspect_id, rule_id).await?;
                    let note = format!("Hadir jam {}", arrival_time);
                    (rule.point, Some(aspect.id), Some(rule.id), note, false, 0)
                }
                _ => {
                    let settings = self.settings_service.resolve().await?;
                    let outcome = calculate_lateness(
                        settings.school_start_time,
                        arrival_time,
                        settings.late_penalty_minutes,
                        settings.late_penalty_points,
                    )?;
                    (
                        outcome.point,
                        None,
                        None,
                        outcome.note,
                        outcome.is_late,
                        outcome.late_minutes,
                    )
                }
            };

        let record = self
            .write_record(
                &student,
                RecordPointCommand {
                    student_id: student.id.clone(),
                    point,
                    aspect_id,
                    rule_id,
                    input_date,
                    note: Some(note),
                    input_by: Some(actor.id.clone()),
                },
            )
            .await?;

        Ok(ScanResult {
            record_id: record.id,
            student_name: student.name,
            class_name: student.class_name,
            arrival_time,
            is_late,
            late_minutes,
            point,
        })
    }

    /// Apply one rule to many students.
    ///
    /// Unknown students and students without a class are skipped and
    /// reported back; everyone else is written in a single transaction.
    pub async fn create_records(
        &self,
        actor: &Staff,
        command: CreateRecordsCommand,
    ) -> Result<CreateRecordsResult> {
        info!(
            "Creating records for {} students by {}",
            command.student_ids.len(),
            actor.id
        );

        if command.student_ids.is_empty() {
            return Err(PointError::invalid("Select at least one student").into());
        }
        let (aspect_id, rule_id) =
            match (command.aspect_id.as_deref(), command.rule_id.as_deref()) {
                (Some(aspect_id), Some(rule_id)) => (aspect_id, rule_id),
                _ => {
                    return Err(
                        PointError::invalid("Both an aspect and a rule are required").into()
                    )
                }
            };
        let (aspect, rule) = self.require_rule_of_aspect(aspect_id, rule_id).await?;

        let input_date = command.input_date.unwrap_or_else(today);

        let students: HashMap<String, Student> = self
            .student_repository
            .get_students_by_ids(&command.student_ids)
            .await
            .map_err(PointError::persistence)?
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        let created_at = timestamp_now();
        let mut records = Vec::new();
        let mut skipped_student_ids = Vec::new();
        for student_id in &command.student_ids {
            match students.get(student_id) {
                Some(student) if student.class_id.is_some() => records.push(PointRecord {
                    id: uuid::Uuid::new_v4().to_string(),
                    student_id: student.id.clone(),
                    class_id: student.class_id.clone(),
                    aspect_id: Some(aspect.id.clone()),
                    rule_id: Some(rule.id.clone()),
                    point: rule.point,
                    input_date,
                    note: None,
                    input_by: Some(actor.id.clone()),
                    created_at: created_at.clone(),
                }),
                _ => skipped_student_ids.push(student_id.clone()),
            }
        }

        if !skipped_student_ids.is_empty() {
            warn!("Skipped students without a class or record: {:?}", skipped_student_ids);
        }

        self.record_repository
            .store_records(&records)
            .await
            .map_err(PointError::persistence)?;

        info!(
            "Recorded rule '{}' ({} points) for {} students",
            rule.name,
            rule.point,
            records.len()
        );

        Ok(CreateRecordsResult {
            count: records.len(),
            skipped_student_ids,
        })
    }

    /// Find the attendance aspect, creating it if this is its first use.
    ///
    /// Concurrent first uses race on the unique aspect name; the loser's
    /// insert is ignored and both read back the same row.
    pub async fn attendance_aspect(&self) -> Result<Aspect> {
        if let Some(aspect) = self
            .aspect_repository
            .find_aspect_by_name(ATTENDANCE_ASPECT_NAME)
            .await
            .map_err(PointError::persistence)?
        {
            return Ok(aspect);
        }

        let candidate = Aspect::attendance(uuid::Uuid::new_v4().to_string(), timestamp_now());
        let inserted = self
            .aspect_repository
            .store_aspect_if_absent(&candidate)
            .await
            .map_err(PointError::persistence)?;
        if inserted {
            info!("Created attendance aspect {}", candidate.id);
        }

        let aspect = self
            .aspect_repository
            .find_aspect_by_name(ATTENDANCE_ASPECT_NAME)
            .await
            .map_err(PointError::persistence)?
            .ok_or_else(|| PointError::persistence("Attendance aspect vanished after insert"))?;
        Ok(aspect)
    }

    async fn write_record(
        &self,
        student: &Student,
        command: RecordPointCommand,
    ) -> Result<PointRecord> {
        let aspect_id = match command.aspect_id {
            Some(aspect_id) => aspect_id,
            None => self.attendance_aspect().await?.id,
        };

        let record = PointRecord {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: student.id.clone(),
            class_id: student.class_id.clone(),
            aspect_id: Some(aspect_id),
            rule_id: command.rule_id,
            point: command.point,
            input_date: command.input_date,
            note: command.note,
            input_by: command.input_by,
            created_at: timestamp_now(),
        };

        self.record_repository
            .store_record(&record)
            .await
            .map_err(PointError::persistence)?;

        info!(
            "Recorded {} points for student {} ({})",
            record.point, student.name, record.id
        );
        Ok(record)
    }

    async fn require_student(&self, student_id: &str) -> Result<Student> {
        let student = self
            .student_repository
            .get_student(student_id)
            .await
            .map_err(PointError::persistence)?
            .ok_or_else(|| PointError::not_found("Student", student_id))?;
        Ok(student)
    }

    async fn require_rule_of_aspect(
        &self,
        aspect_id: &str,
        rule_id: &str,
    ) -> Result<(Aspect, AspectRule)> {
        let aspect = self
            .aspect_repository
            .get_aspect(aspect_id)
            .await
            .map_err(PointError::persistence)?
            .ok_or_else(|| PointError::not_found("Aspect", aspect_id))?;
        let rule = self
            .aspect_repository
            .get_rule(rule_id)
            .await
            .map_err(PointError::persistence)?
            .ok_or_else(|| PointError::not_found("Rule", rule_id))?;

        if rule.aspect_id != aspect.id {
            return Err(PointError::invalid(format!(
                "Rule '{}' does not belong to aspect '{}'",
                rule.name, aspect.name
            ))
            .into());
        }
        Ok((aspect, rule))
    }
}
