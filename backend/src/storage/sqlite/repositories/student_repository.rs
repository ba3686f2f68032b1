use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{parse_column, placeholders};
use crate::domain::models::student::Student;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::StudentStorage;

/// Repository for student operations
#[derive(Clone)]
pub struct StudentRepository {
    db: DbConnection,
}

const SELECT_STUDENT: &str = r#"
    SELECT s.id, s.nisn, s.name, s.gender, s.class_id, s.created_at,
           c.name AS class_name
    FROM students s
    LEFT JOIN classes c ON c.id = s.class_id
"#;

const INSERT_STUDENT: &str = r#"
    INSERT INTO students (id, nisn, name, gender, class_id, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

impl StudentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<Student> {
        let gender: Option<String> = row.get("gender");
        Ok(Student {
            id: row.get("id"),
            nisn: row.get("nisn"),
            name: row.get("name"),
            gender: gender
                .as_deref()
                .map(|g| parse_column("gender", g))
                .transpose()?,
            class_id: row.get("class_id"),
            class_name: row.get("class_name"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl StudentStorage for StudentRepository {
    async fn store_student(&self, student: &Student) -> Result<()> {
        sqlx::query(INSERT_STUDENT)
            .bind(&student.id)
            .bind(&student.nisn)
            .bind(&student.name)
            .bind(student.gender.map(|g| g.to_string()))
            .bind(&student.class_id)
            .bind(&student.created_at)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn store_students(&self, students: &[Student]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        for student in students {
            sqlx::query(INSERT_STUDENT)
                .bind(&student.id)
                .bind(&student.nisn)
                .bind(&student.name)
                .bind(student.gender.map(|g| g.to_string()))
                .bind(&student.class_id)
                .bind(&student.created_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_student(&self, student_id: &str) -> Result<Option<Student>> {
        let sql = format!("{} WHERE s.id = ?", SELECT_STUDENT);
        let row = sqlx::query(&sql)
            .bind(student_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_students(&self, class_id: Option<&str>) -> Result<Vec<Student>> {
        let rows = match class_id {
            Some(class_id) => {
                let sql = format!("{} WHERE s.class_id = ? ORDER BY s.name ASC", SELECT_STUDENT);
                sqlx::query(&sql)
                    .bind(class_id)
                    .fetch_all(self.db.pool())
                    .await?
            }
            None => {
                let sql = format!("{} ORDER BY s.created_at DESC, s.rowid DESC", SELECT_STUDENT);
                sqlx::query(&sql).fetch_all(self.db.pool()).await?
            }
        };

        rows.iter().map(Self::from_row).collect()
    }

    async fn get_students_by_ids(&self, student_ids: &[String]) -> Result<Vec<Student>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{} WHERE s.id IN ({})",
            SELECT_STUDENT,
            placeholders(student_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in student_ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(self.db.pool()).await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update_student(&self, student: &Student) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET nisn = ?, name = ?, gender = ?, class_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&student.nisn)
        .bind(&student.name)
        .bind(student.gender.map(|g| g.to_string()))
        .bind(&student.class_id)
        .bind(&student.id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_student(&self, student_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(student_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_students(&self, student_ids: &[String]) -> Result<u64> {
        if student_ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM students WHERE id IN ({})",
            placeholders(student_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in student_ids {
            query = query.bind(id);
        }
        let result = query.execute(self.db.pool()).await?;
        Ok(result.rows_affected())
    }

    async fn count_students(&self, class_id: Option<&str>) -> Result<u64> {
        let row = match class_id {
            Some(class_id) => {
                sqlx::query("SELECT COUNT(*) AS count FROM students WHERE class_id = ?")
                    .bind(class_id)
                    .fetch_one(self.db.pool())
                    .await?
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM students")
                    .fetch_one(self.db.pool())
                    .await?
            }
        };
        let count: i64 = row.get("count");
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::school_class::SchoolClass;
    use crate::storage::sqlite::repositories::ClassRepository;
    use crate::storage::traits::ClassStorage;
    use shared::Gender;

    async fn setup() -> (StudentRepository, ClassRepository) {
        let db = DbConnection::init_test().await.unwrap();
        let classes = ClassRepository::new(db.clone());
        classes
            .store_class(&SchoolClass {
                id: "class-1".to_string(),
                name: "X-1".to_string(),
                grade: Some("10".to_string()),
                created_at: "2025-01-01T00:00:00Z".to_string(),
            })
            .await
            .unwrap();
        (StudentRepository::new(db), classes)
    }

    fn student(id: &str, name: &str, class_id: Option<&str>, created_at: &str) -> Student {
        Student {
            id: id.to_string(),
            nisn: Some(format!("00{}", id)),
            name: name.to_string(),
            gender: Some(Gender::Female),
            class_id: class_id.map(str::to_string),
            class_name: None,
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_student_joins_class_name() {
        let (repo, _) = setup().await;
        repo.store_student(&student("s1", "Ani", Some("class-1"), "2025-01-02T00:00:00Z"))
            .await
            .unwrap();

        let stored = repo.get_student("s1").await.unwrap().unwrap();
        assert_eq!(stored.class_name.as_deref(), Some("X-1"));
        assert_eq!(stored.gender, Some(Gender::Female));
        assert!(repo.get_student("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders() {
        let (repo, _) = setup().await;
        repo.store_students(&[
            student("s1", "Citra", Some("class-1"), "2025-01-01T00:00:00Z"),
            student("s2", "Adi", Some("class-1"), "2025-01-03T00:00:00Z"),
            student("s3", "Budi", None, "2025-01-02T00:00:00Z"),
        ])
        .await
        .unwrap();

        let all: Vec<String> = repo
            .list_students(None)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(all, vec!["s2", "s3", "s1"]);

        let in_class: Vec<String> = repo
            .list_students(Some("class-1"))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(in_class, vec!["Adi", "Citra"]);
        assert_eq!(repo.count_students(Some("class-1")).await.unwrap(), 2);
        assert_eq!(repo.count_students(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_batch_import_is_all_or_nothing() {
        let (repo, _) = setup().await;
        let duplicate = student("s1", "Ani", None, "2025-01-01T00:00:00Z");
        let result = repo.store_students(&[duplicate.clone(), duplicate]).await;
        assert!(result.is_err());
        assert_eq!(repo.count_students(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleting_class_detaches_students() {
        let (repo, classes) = setup().await;
        repo.store_student(&student("s1", "Ani", Some("class-1"), "2025-01-01T00:00:00Z"))
            .await
            .unwrap();
        classes.delete_class("class-1").await.unwrap();

        let stored = repo.get_student("s1").await.unwrap().unwrap();
        assert_eq!(stored.class_id, None);
    }

    #[tokio::test]
    async fn test_bulk_delete_counts_rows() {
        let (repo, _) = setup().await;
        repo.store_students(&[
            student("s1", "Ani", None, "2025-01-01T00:00:00Z"),
            student("s2", "Budi", None, "2025-01-01T00:00:00Z"),
        ])
        .await
        .unwrap();

        let ids = vec!["s1".to_string(), "s2".to_string(), "nope".to_string()];
        assert_eq!(repo.get_students_by_ids(&ids).await.unwrap().len(), 2);
        assert_eq!(repo.delete_students(&ids).await.unwrap(), 2);
        assert_eq!(repo.delete_students(&[]).await.unwrap(), 0);
    }
}
