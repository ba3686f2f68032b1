//! Record listings, exports and the administrative bulk delete.
use std::sync::Arc;

use anyhow::Result;
use shared::StaffRole;
use tracing::{info, warn};

use crate::domain::commands::reports::{DeleteKind, DeleteRecordsCommand};
use crate::domain::errors::PointError;
use crate::domain::export;
use crate::domain::models::aspect::ATTENDANCE_ASPECT_NAME;
use crate::domain::models::record::{AspectScope, RecordFilter, RecordView};
use crate::domain::models::staff::Staff;
use crate::storage::{AspectStorage, ClassStorage, Connection, RecordStorage};

/// A rendered export ready to be sent as a download
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ReportService<C: Connection> {
    record_repository: C::RecordRepository,
    class_repository: C::ClassRepository,
    aspect_repository: C::AspectRepository,
}

impl<C: Connection> ReportService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            record_repository: connection.create_record_repository(),
            class_repository: connection.create_class_repository(),
            aspect_repository: connection.create_aspect_repository(),
        }
    }

    /// Records matching the filter, newest input date first
    pub async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordView>> {
        validate_range(filter)?;
        let records = self.record_repository.list_records(filter).await?;
        info!("Found {} records for {:?}", records.len(), filter);
        Ok(records)
    }

    pub async fn export_csv(&self, filter: &RecordFilter) -> Result<ExportFile> {
        let records = self.list_records(filter).await?;
        let bytes = export::records_to_csv(&records)?;

        info!("Exported {} records as CSV", records.len());
        Ok(ExportFile {
            file_name: format!("laporan-poin-{}.csv", range_label(filter)),
            content_type: "text/csv; charset=utf-8",
            bytes,
        })
    }

    /// PDF report for one class; the filter's own class is overridden
    pub async fn export_pdf(&self, class_id: &str, filter: &RecordFilter) -> Result<ExportFile> {
        let class = self
            .class_repository
            .get_class(class_id)
            .await?
            .ok_or_else(|| PointError::not_found("Class", class_id))?;

        let filter = RecordFilter {
            class_id: Some(class.id.clone()),
            ..filter.clone()
        };
        let records = self.list_records(&filter).await?;
        let bytes = export::records_to_pdf(&class.name, &records)?;

        info!("Exported {} records of class {} as PDF", records.len(), class.name);
        Ok(ExportFile {
            file_name: format!("laporan-poin-{}.pdf", slug(&class.name)),
            content_type: "application/pdf",
            bytes,
        })
    }

    /// Administrative bulk delete. Admin and principal only.
    pub async fn delete_records(
        &self,
        actor: &Staff,
        command: DeleteRecordsCommand,
    ) -> Result<u64> {
        actor.ensure_role(&[StaffRole::Admin, StaffRole::Kepsek], "delete records")?;
        warn!(
            "Bulk delete of {:?} records from {:?} to {:?} by {}",
            command.kind, command.start_date, command.end_date, actor.id
        );

        validate_range(&RecordFilter {
            start_date: command.start_date,
            end_date: command.end_date,
            ..Default::default()
        })?;

        let attendance_id = self
            .aspect_repository
            .find_aspect_by_name(ATTENDANCE_ASPECT_NAME)
            .await?
            .map(|a| a.id);

        let scope = match command.kind {
            DeleteKind::All => AspectScope::All,
            DeleteKind::Attendance => AspectScope::Only(
                attendance_id
                    .ok_or_else(|| PointError::not_found("Aspect", ATTENDANCE_ASPECT_NAME))?,
            ),
            DeleteKind::Violations => AspectScope::Except(attendance_id),
        };

        let deleted = self
            .record_repository
            .delete_records(&scope, command.start_date, command.end_date)
            .await?;

        info!("Deleted {} records", deleted);
        Ok(deleted)
    }
}

fn validate_range(filter: &RecordFilter) -> Result<(), PointError> {
    match (filter.start_date, filter.end_date) {
        (Some(start), Some(end)) if start > end => Err(PointError::invalid(format!(
            "Start date {} is after end date {}",
            start, end
        ))),
        _ => Ok(()),
    }
}

fn range_label(filter: &RecordFilter) -> String {
    match (filter.start_date, filter.end_date) {
        (Some(start), Some(end)) => format!("{}_{}", start, end),
        (Some(start), None) => format!("{}_", start),
        (None, Some(end)) => format!("_{}", end),
        (None, None) => "semua".to_string(),
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::recording::ScanCommand;
    use crate::domain::record_service::RecordService;
    use crate::domain::settings_service::SettingsService;
    use crate::domain::test_support::*;
    use crate::storage::DbConnection;
    use chrono::NaiveDate;
    use shared::Polarity;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    struct Fixture {
        service: ReportService<DbConnection>,
        records: RecordService<DbConnection>,
        scanner: Staff,
    }

    async fn fixture() -> Fixture {
        let conn = connection().await;
        seed_class(&conn, "class-1", "X-1").await;
        seed_class(&conn, "class-2", "X-2").await;
        seed_student(&conn, "s1", "Ani", Some("class-1")).await;
        seed_student(&conn, "s2", "Budi", Some("class-2")).await;
        seed_aspect(&conn, "kerapian", "Kerapian", Polarity::Negative).await;
        seed_rule(&conn, "rambut", "kerapian", "Rambut panjang", -5).await;
        seed_aspect(&conn, "prestasi", "Prestasi", Polarity::Positive).await;
        seed_rule(&conn, "juara", "prestasi", "Juara kelas", 20).await;

        Fixture {
            service: ReportService::new(conn.clone()),
            records: RecordService::new(conn.clone(), SettingsService::new(conn)),
            scanner: staff("scanner", StaffRole::PetugasScan, None),
        }
    }

    async fn scan(f: &Fixture, student: &str, day: u32, rule: Option<(&str, &str)>) {
        f.records
            .record_scan(
                &f.scanner,
                ScanCommand {
                    token: student.to_string(),
                    aspect_id: rule.map(|r| r.0.to_string()),
                    rule_id: rule.map(|r| r.1.to_string()),
                    input_date: Some(date(day)),
                    arrival_time: Some("07:40".parse().unwrap()),
                },
            )
            .await
            .unwrap();
    }

    async fn seed_history(f: &Fixture) {
        scan(f, "s1", 6, None).await;
        scan(f, "s2", 6, None).await;
        scan(f, "s1", 7, Some(("kerapian", "rambut"))).await;
        scan(f, "s2", 8, Some(("prestasi", "juara"))).await;
    }

    #[tokio::test]
    async fn test_list_filters_by_polarity_and_range() {
        let f = fixture().await;
        seed_history(&f).await;

        let positive = f
            .service
            .list_records(&RecordFilter {
                polarity: Some(Polarity::Positive),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(positive.len(), 1);
        assert_eq!(positive[0].student_name, "Budi");

        let first_days = f
            .service
            .list_records(&RecordFilter {
                start_date: Some(date(6)),
                end_date: Some(date(7)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(first_days.len(), 3);

        let inverted = f
            .service
            .list_records(&RecordFilter {
                start_date: Some(date(8)),
                end_date: Some(date(6)),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            inverted.downcast_ref::<PointError>(),
            Some(PointError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_csv_export() {
        let f = fixture().await;
        seed_history(&f).await;

        let file = f.service.export_csv(&RecordFilter::default()).await.unwrap();
        assert_eq!(file.file_name, "laporan-poin-semua.csv");
        let text = String::from_utf8(file.bytes).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("Juara kelas,20"));
    }

    #[tokio::test]
    async fn test_pdf_export_is_scoped_to_class() {
        let f = fixture().await;
        seed_history(&f).await;

        let file = f
            .service
            .export_pdf("class-1", &RecordFilter::default())
            .await
            .unwrap();
        assert_eq!(file.file_name, "laporan-poin-x-1.pdf");
        assert_eq!(file.content_type, "application/pdf");
        assert!(file.bytes.starts_with(b"%PDF"));

        let err = f
            .service
            .export_pdf("nope", &RecordFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Class not found: nope");
    }

    #[tokio::test]
    async fn test_delete_requires_admin_or_kepsek() {
        let f = fixture().await;
        seed_history(&f).await;

        let command = || DeleteRecordsCommand {
            kind: DeleteKind::All,
            start_date: None,
            end_date: None,
        };
        let err = f.service.delete_records(&f.scanner, command()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PointError>(),
            Some(PointError::Unauthorized(_))
        ));

        let kepsek = staff("kepsek", StaffRole::Kepsek, None);
        assert_eq!(f.service.delete_records(&kepsek, command()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_delete_attendance_and_violations() {
        let f = fixture().await;
        seed_history(&f).await;
        let admin = staff("admin", StaffRole::Admin, None);

        let deleted = f
            .service
            .delete_records(
                &admin,
                DeleteRecordsCommand {
                    kind: DeleteKind::Attendance,
                    start_date: Some(date(6)),
                    end_date: Some(date(6)),
                },
            )
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        let deleted = f
            .service
            .delete_records(
                &admin,
                DeleteRecordsCommand {
                    kind: DeleteKind::Violations,
                    start_date: None,
                    end_date: Some(date(7)),
                },
            )
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let remaining = f.service.list_records(&RecordFilter::default()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].rule_name.as_deref(), Some("Juara kelas"));
    }

    #[tokio::test]
    async fn test_delete_attendance_without_attendance_aspect() {
        let f = fixture().await;
        let admin = staff("admin", StaffRole::Admin, None);
        let err = f
            .service
            .delete_records(
                &admin,
                DeleteRecordsCommand {
                    kind: DeleteKind::Attendance,
                    start_date: None,
                    end_date: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Aspect not found: Kehadiran");
    }
}
