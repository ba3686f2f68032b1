use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use crate::domain::models::school_class::SchoolClass;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::ClassStorage;

/// Repository for class operations
#[derive(Clone)]
pub struct ClassRepository {
    db: DbConnection,
}

impl ClassRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> SchoolClass {
        SchoolClass {
            id: row.get("id"),
            name: row.get("name"),
            grade: row.get("grade"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl ClassStorage for ClassRepository {
    async fn store_class(&self, class: &SchoolClass) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO classes (id, name, grade, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&class.id)
        .bind(&class.name)
        .bind(&class.grade)
        .bind(&class.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_class(&self, class_id: &str) -> Result<Option<SchoolClass>> {
        let row = sqlx::query("SELECT id, name, grade, created_at FROM classes WHERE id = ?")
            .bind(class_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.as_ref().map(Self::from_row))
    }

    async fn list_classes(&self) -> Result<Vec<SchoolClass>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, grade, created_at
            FROM classes
            ORDER BY grade ASC, name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::from_row).collect())
    }

    async fn update_class(&self, class: &SchoolClass) -> Result<bool> {
        let result = sqlx::query("UPDATE classes SET name = ?, grade = ? WHERE id = ?")
            .bind(&class.name)
            .bind(&class.grade)
            .bind(&class.id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_class(&self, class_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM classes WHERE id = ?")
            .bind(class_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_classes(&self) -> Result<u64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM classes")
            .fetch_one(self.db.pool())
            .await?
            .get("count");
        Ok(count as u64)
    }
}
