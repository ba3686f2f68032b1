use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::parse_column;
use crate::domain::models::aspect::{Aspect, AspectRule};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::AspectStorage;

/// Repository for aspects and their rules
#[derive(Clone)]
pub struct AspectRepository {
    db: DbConnection,
}

impl AspectRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn aspect_from_row(row: &SqliteRow) -> Result<Aspect> {
        let polarity: String = row.get("polarity");
        let input_method: String = row.get("input_method");
        Ok(Aspect {
            id: row.get("id"),
            name: row.get("name"),
            polarity: parse_column("polarity", &polarity)?,
            input_method: parse_column("input_method", &input_method)?,
            active: row.get("active"),
            created_at: row.get("created_at"),
        })
    }

    fn rule_from_row(row: &SqliteRow) -> AspectRule {
        AspectRule {
            id: row.get("id"),
            aspect_id: row.get("aspect_id"),
            name: row.get("name"),
            point: row.get("point"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl AspectStorage for AspectRepository {
    async fn store_aspect(&self, aspect: &Aspect) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO aspects (id, name, polarity, input_method, active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&aspect.id)
        .bind(&aspect.name)
        .bind(aspect.polarity.to_string())
        .bind(aspect.input_method.to_string())
        .bind(aspect.active)
        .bind(&aspect.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn store_aspect_if_absent(&self, aspect: &Aspect) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO aspects (id, name, polarity, input_method, active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&aspect.id)
        .bind(&aspect.name)
        .bind(aspect.polarity.to_string())
        .bind(aspect.input_method.to_string())
        .bind(aspect.active)
        .bind(&aspect.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_aspect(&self, aspect_id: &str) -> Result<Option<Aspect>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, polarity, input_method, active, created_at
            FROM aspects
            WHERE id = ?
            "#,
        )
        .bind(aspect_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::aspect_from_row).transpose()
    }

    async fn find_aspect_by_name(&self, name: &str) -> Result<Option<Aspect>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, polarity, input_method, active, created_at
            FROM aspects
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::aspect_from_row).transpose()
    }

    async fn list_aspects(&self) -> Result<Vec<Aspect>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, polarity, input_method, active, created_at
            FROM aspects
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::aspect_from_row).collect()
    }

    async fn update_aspect(&self, aspect: &Aspect) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE aspects
            SET name = ?, polarity = ?, input_method = ?, active = ?
            WHERE id = ?
            "#,
        )
        .bind(&aspect.name)
        .bind(aspect.polarity.to_string())
        .bind(aspect.input_method.to_string())
        .bind(aspect.active)
        .bind(&aspect.id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_aspect(&self, aspect_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM aspects WHERE id = ?")
            .bind(aspect_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn store_rule(&self, rule: &AspectRule) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO aspect_rules (id, aspect_id, name, point, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rule.id)
        .bind(&rule.aspect_id)
        .bind(&rule.name)
        .bind(rule.point)
        .bind(&rule.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_rule(&self, rule_id: &str) -> Result<Option<AspectRule>> {
        let row = sqlx::query(
            r#"
            SELECT id, aspect_id, name, point, created_at
            FROM aspect_rules
            WHERE id = ?
            "#,
        )
        .bind(rule_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::rule_from_row))
    }

    async fn list_rules(&self) -> Result<Vec<AspectRule>> {
        let rows = sqlx::query(
            r#"
            SELECT id, aspect_id, name, point, created_at
            FROM aspect_rules
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(Self::rule_from_row).collect())
    }

    async fn update_rule(&self, rule: &AspectRule) -> Result<bool> {
        let result = sqlx::query("UPDATE aspect_rules SET name = ?, point = ? WHERE id = ?")
            .bind(&rule.name)
            .bind(rule.point)
            .bind(&rule.id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_rule(&self, rule_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM aspect_rules WHERE id = ?")
            .bind(rule_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
