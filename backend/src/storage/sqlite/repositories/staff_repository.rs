use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::parse_column;
use crate::domain::models::staff::Staff;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::StaffStorage;

/// Repository for staff profiles
#[derive(Clone)]
pub struct StaffRepository {
    db: DbConnection,
}

impl StaffRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<Staff> {
        let role: String = row.get("role");
        Ok(Staff {
            id: row.get("id"),
            name: row.get("name"),
            role: parse_column("role", &role)?,
            class_id: row.get("class_id"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl StaffStorage for StaffRepository {
    async fn store_staff(&self, staff: &Staff) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO staff (id, name, role, class_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&staff.id)
        .bind(&staff.name)
        .bind(staff.role.to_string())
        .bind(&staff.class_id)
        .bind(&staff.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn store_first_staff(&self, staff: &Staff) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO staff (id, name, role, class_id, created_at)
            SELECT ?, ?, ?, ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM staff)
            "#,
        )
        .bind(&staff.id)
        .bind(&staff.name)
        .bind(staff.role.to_string())
        .bind(&staff.class_id)
        .bind(&staff.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn get_staff(&self, staff_id: &str) -> Result<Option<Staff>> {
        let row = sqlx::query("SELECT id, name, role, class_id, created_at FROM staff WHERE id = ?")
            .bind(staff_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_staff(&self) -> Result<Vec<Staff>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, role, class_id, created_at
            FROM staff
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::StaffRole;

    #[tokio::test]
    async fn test_store_and_get_staff() {
        let repo = StaffRepository::new(DbConnection::init_test().await.unwrap());
        let staff = Staff {
            id: "staff-1".to_string(),
            name: "Bu Sari".to_string(),
            role: StaffRole::PetugasScan,
            class_id: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };
        repo.store_staff(&staff).await.unwrap();

        assert_eq!(repo.get_staff("staff-1").await.unwrap(), Some(staff));
        assert!(repo.get_staff("nobody").await.unwrap().is_none());
        assert_eq!(repo.list_staff().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_first_staff_only_into_empty_table() {
        let repo = StaffRepository::new(DbConnection::init_test().await.unwrap());
        let staff = |id: &str| Staff {
            id: id.to_string(),
            name: "Pak Budi".to_string(),
            role: StaffRole::Admin,
            class_id: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };

        assert!(repo.store_first_staff(&staff("first")).await.unwrap());
        assert!(!repo.store_first_staff(&staff("second")).await.unwrap());
        assert!(repo.get_staff("second").await.unwrap().is_none());
        assert_eq!(repo.list_staff().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_role_in_storage_is_an_error() {
        let db = DbConnection::init_test().await.unwrap();
        sqlx::query(
            "INSERT INTO staff (id, name, role, created_at) VALUES ('x', 'X', 'janitor', 'now')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let repo = StaffRepository::new(db);
        assert!(repo.get_staff("x").await.is_err());
    }
}
