use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use crate::domain::models::settings::SettingEntry;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::SettingsStorage;

/// Repository for the key/value settings table
#[derive(Clone)]
pub struct SettingsRepository {
    db: DbConnection,
}

impl SettingsRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

const UPSERT_SQL: &str = r#"
    INSERT INTO settings (key, value, updated_at)
    VALUES (?, ?, ?)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
"#;

#[async_trait]
impl SettingsStorage for SettingsRepository {
    async fn list_settings(&self) -> Result<Vec<SettingEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT key, value, updated_at
            FROM settings
            ORDER BY key ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let settings = rows
            .iter()
            .map(|row| SettingEntry {
                key: row.get("key"),
                value: row.get("value"),
                updated_at: row.get("updated_at"),
            })
            .collect();

        Ok(settings)
    }

    async fn get_setting(&self, key: &str) -> Result<Option<SettingEntry>> {
        let row = sqlx::query("SELECT key, value, updated_at FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(r) => Ok(Some(SettingEntry {
                key: r.get("key"),
                value: r.get("value"),
                updated_at: r.get("updated_at"),
            })),
            None => Ok(None),
        }
    }

    async fn upsert_setting(&self, entry: &SettingEntry) -> Result<()> {
        sqlx::query(UPSERT_SQL)
            .bind(&entry.key)
            .bind(&entry.value)
            .bind(&entry.updated_at)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn upsert_settings(&self, entries: &[SettingEntry]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        for entry in entries {
            sqlx::query(UPSERT_SQL)
                .bind(&entry.key)
                .bind(&entry.value)
                .bind(&entry.updated_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: &str) -> SettingEntry {
        SettingEntry {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: "2025-01-06T07:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let repo = SettingsRepository::new(DbConnection::init_test().await.unwrap());
        assert!(repo.get_setting("school_start_time").await.unwrap().is_none());
        assert!(repo.list_settings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_value() {
        let repo = SettingsRepository::new(DbConnection::init_test().await.unwrap());
        repo.upsert_setting(&entry("school_start_time", "07:30")).await.unwrap();
        repo.upsert_setting(&entry("school_start_time", "07:00")).await.unwrap();

        let stored = repo.get_setting("school_start_time").await.unwrap().unwrap();
        assert_eq!(stored.value, "07:00");
        assert_eq!(repo.list_settings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_upsert_lists_by_key() {
        let repo = SettingsRepository::new(DbConnection::init_test().await.unwrap());
        repo.upsert_settings(&[
            entry("school_start_time", "07:15"),
            entry("late_penalty_minutes", "10"),
        ])
        .await
        .unwrap();

        let keys: Vec<String> = repo
            .list_settings()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(keys, vec!["late_penalty_minutes", "school_start_time"]);
    }
}
