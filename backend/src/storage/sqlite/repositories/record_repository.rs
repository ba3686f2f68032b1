use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{parse_column, parse_date};
use crate::domain::models::record::{AspectScope, PointRecord, RecordFilter, RecordView};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::RecordStorage;

const DATE_FORMAT: &str = "%Y-%m-%d";

const INSERT_RECORD: &str = r#"
    INSERT INTO records (id, student_id, class_id, aspect_id, rule_id, point,
                         input_date, note, input_by, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Repository for point records
#[derive(Clone)]
pub struct RecordRepository {
    db: DbConnection,
}

impl RecordRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn view_from_row(row: &SqliteRow) -> Result<RecordView> {
        let polarity: Option<String> = row.get("aspect_polarity");
        let input_date: String = row.get("input_date");
        Ok(RecordView {
            id: row.get("id"),
            student_id: row.get("student_id"),
            student_name: row.get("student_name"),
            student_nisn: row.get("student_nisn"),
            class_id: row.get("class_id"),
            class_name: row.get("class_name"),
            aspect_id: row.get("aspect_id"),
            aspect_name: row.get("aspect_name"),
            aspect_polarity: polarity
                .as_deref()
                .map(|p| parse_column("polarity", p))
                .transpose()?,
            rule_id: row.get("rule_id"),
            rule_name: row.get("rule_name"),
            point: row.get("point"),
            input_date: parse_date(&input_date)?,
            note: row.get("note"),
            input_by: row.get("input_by"),
            created_at: row.get("created_at"),
        })
    }
}

/// Append the inclusive date bounds to a WHERE clause under construction
fn push_date_bounds(
    conditions: &mut Vec<&'static str>,
    binds: &mut Vec<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) {
    if let Some(start) = start_date {
        conditions.push("r.input_date >= ?");
        binds.push(start.format(DATE_FORMAT).to_string());
    }
    if let Some(end) = end_date {
        conditions.push("r.input_date <= ?");
        binds.push(end.format(DATE_FORMAT).to_string());
    }
}

fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

#[async_trait]
impl RecordStorage for RecordRepository {
    async fn store_record(&self, record: &PointRecord) -> Result<()> {
        sqlx::query(INSERT_RECORD)
            .bind(&record.id)
            .bind(&record.student_id)
            .bind(&record.class_id)
            .bind(&record.aspect_id)
            .bind(&record.rule_id)
            .bind(record.point)
            .bind(record.input_date.format(DATE_FORMAT).to_string())
            .bind(&record.note)
            .bind(&record.input_by)
            .bind(&record.created_at)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn store_records(&self, records: &[PointRecord]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        for record in records {
            sqlx::query(INSERT_RECORD)
                .bind(&record.id)
                .bind(&record.student_id)
                .bind(&record.class_id)
                .bind(&record.aspect_id)
                .bind(&record.rule_id)
                .bind(record.point)
                .bind(record.input_date.format(DATE_FORMAT).to_string())
                .bind(&record.note)
                .bind(&record.input_by)
                .bind(&record.created_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RecordView>> {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        push_date_bounds(&mut conditions, &mut binds, filter.start_date, filter.end_date);
        if let Some(class_id) = &filter.class_id {
            conditions.push("r.class_id = ?");
            binds.push(class_id.clone());
        }
        if let Some(polarity) = filter.polarity {
            conditions.push("a.polarity = ?");
            binds.push(polarity.to_string());
        }

        let sql = format!(
            r#"
            SELECT r.id, r.student_id, r.class_id, r.aspect_id, r.rule_id, r.point,
                   r.input_date, r.note, r.input_by, r.created_at,
                   s.name AS student_name, s.nisn AS student_nisn,
                   c.name AS class_name,
                   a.name AS aspect_name, a.polarity AS aspect_polarity,
                   ar.name AS rule_name
            FROM records r
            JOIN students s ON s.id = r.student_id
            LEFT JOIN classes c ON c.id = r.class_id
            LEFT JOIN aspects a ON a.id = r.aspect_id
            LEFT JOIN aspect_rules ar ON ar.id = r.rule_id
            {}
            ORDER BY r.input_date DESC, r.created_at DESC, r.rowid DESC
            "#,
            where_clause(&conditions)
        );

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let rows = query.fetch_all(self.db.pool()).await?;

        rows.iter().map(Self::view_from_row).collect()
    }

    async fn delete_records(
        &self,
        scope: &AspectScope,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<u64> {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        match scope {
            AspectScope::All | AspectScope::Except(None) => {}
            AspectScope::Only(aspect_id) => {
                conditions.push("r.aspect_id = ?");
                binds.push(aspect_id.clone());
            }
            AspectScope::Except(Some(aspect_id)) => {
                conditions.push("(r.aspect_id IS NULL OR r.aspect_id <> ?)");
                binds.push(aspect_id.clone());
            }
        }
        push_date_bounds(&mut conditions, &mut binds, start_date, end_date);

        let sql = format!(
            "DELETE FROM records WHERE id IN (SELECT r.id FROM records r {})",
            where_clause(&conditions)
        );
        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }
        let result = query.execute(self.db.pool()).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::aspect::{Aspect, AspectRule};
    use crate::domain::models::school_class::SchoolClass;
    use crate::domain::models::student::Student;
    use crate::storage::sqlite::repositories::{
        AspectRepository, ClassRepository, StudentRepository,
    };
    use crate::storage::traits::{AspectStorage, ClassStorage, StudentStorage};
    use shared::{InputMethod, Polarity};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    async fn setup() -> RecordRepository {
        let db = DbConnection::init_test().await.unwrap();
        ClassRepository::new(db.clone())
            .store_class(&SchoolClass {
                id: "class-1".to_string(),
                name: "X-1".to_string(),
                grade: None,
                created_at: "2025-01-01T00:00:00Z".to_string(),
            })
            .await
            .unwrap();
        StudentRepository::new(db.clone())
            .store_student(&Student {
                id: "s1".to_string(),
                nisn: Some("123".to_string()),
                name: "Ani".to_string(),
                gender: None,
                class_id: Some("class-1".to_string()),
                class_name: None,
                created_at: "2025-01-01T00:00:00Z".to_string(),
            })
            .await
            .unwrap();

        let aspects = AspectRepository::new(db.clone());
        aspects
            .store_aspect(&Aspect::attendance(
                "att".to_string(),
                "2025-01-01T00:00:00Z".to_string(),
            ))
            .await
            .unwrap();
        aspects
            .store_aspect(&Aspect {
                id: "prestasi".to_string(),
                name: "Prestasi".to_string(),
                polarity: Polarity::Positive,
                input_method: InputMethod::Select,
                active: true,
                created_at: "2025-01-01T00:00:00Z".to_string(),
            })
            .await
            .unwrap();
        aspects
            .store_rule(&AspectRule {
                id: "juara".to_string(),
                aspect_id: "prestasi".to_string(),
                name: "Juara lomba".to_string(),
                point: 10,
                created_at: "2025-01-01T00:00:00Z".to_string(),
            })
            .await
            .unwrap();

        RecordRepository::new(db)
    }

    fn record(
        id: &str,
        aspect_id: &str,
        rule_id: Option<&str>,
        point: i64,
        day: u32,
    ) -> PointRecord {
        PointRecord {
            id: id.to_string(),
            student_id: "s1".to_string(),
            class_id: Some("class-1".to_string()),
            aspect_id: Some(aspect_id.to_string()),
            rule_id: rule_id.map(str::to_string),
            point,
            input_date: date(day),
            note: None,
            input_by: Some("staff-1".to_string()),
            created_at: format!("2025-01-{:02}T07:00:00Z", day),
        }
    }

    #[tokio::test]
    async fn test_list_joins_names_and_orders_newest_first() {
        let repo = setup().await;
        repo.store_record(&record("r1", "att", None, -1, 6)).await.unwrap();
        repo.store_record(&record("r2", "prestasi", Some("juara"), 10, 7)).await.unwrap();

        let views = repo.list_records(&RecordFilter::default()).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, "r2");
        assert_eq!(views[0].student_name, "Ani");
        assert_eq!(views[0].class_name.as_deref(), Some("X-1"));
        assert_eq!(views[0].aspect_name.as_deref(), Some("Prestasi"));
        assert_eq!(views[0].rule_name.as_deref(), Some("Juara lomba"));
        assert_eq!(views[0].aspect_polarity, Some(Polarity::Positive));
        assert_eq!(views[1].input_date, date(6));
    }

    #[tokio::test]
    async fn test_filters_are_inclusive_and_combine() {
        let repo = setup().await;
        repo.store_records(&[
            record("r1", "att", None, -1, 5),
            record("r2", "att", None, -2, 6),
            record("r3", "prestasi", Some("juara"), 10, 7),
            record("r4", "att", None, -1, 8),
        ])
        .await
        .unwrap();

        let filter = RecordFilter {
            start_date: Some(date(6)),
            end_date: Some(date(7)),
            ..Default::default()
        };
        let ids: Vec<String> = repo
            .list_records(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["r3", "r2"]);

        let negative = RecordFilter {
            polarity: Some(Polarity::Negative),
            class_id: Some("class-1".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list_records(&negative).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_by_scope() {
        let repo = setup().await;
        repo.store_records(&[
            record("r1", "att", None, -1, 5),
            record("r2", "att", None, -2, 6),
            record("r3", "prestasi", Some("juara"), 10, 7),
        ])
        .await
        .unwrap();

        let removed = repo
            .delete_records(&AspectScope::Except(Some("att".to_string())), None, None)
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let removed = repo
            .delete_records(&AspectScope::Only("att".to_string()), Some(date(6)), None)
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let removed = repo.delete_records(&AspectScope::All, None, None).await.unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_batch_with_unknown_student_writes_nothing() {
        let repo = setup().await;
        let mut orphan = record("r2", "att", None, -1, 6);
        orphan.student_id = "ghost".to_string();

        let result = repo
            .store_records(&[record("r1", "att", None, -1, 6), orphan])
            .await;
        assert!(result.is_err());
        assert!(repo.list_records(&RecordFilter::default()).await.unwrap().is_empty());
    }
}
