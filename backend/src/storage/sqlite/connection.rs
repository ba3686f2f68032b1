use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

use crate::storage::sqlite::repositories::{
    AspectRepository, ClassRepository, RecordRepository, SettingsRepository, StaffRepository,
    StudentRepository,
};
use crate::storage::traits::Connection;

/// DbConnection owns the SQLite pool and hands out repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Private in-memory database for tests.
    ///
    /// A single long-lived connection keeps the database alive for as long as
    /// the pool exists.
    pub async fn init_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool. Every later query fails, which is how tests simulate
    /// an unreachable store.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS classes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                grade TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                nisn TEXT,
                name TEXT NOT NULL,
                gender TEXT CHECK (gender IN ('L', 'P')),
                class_id TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (class_id) REFERENCES classes (id) ON DELETE SET NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_students_class_id
            ON students(class_id);
            "#,
        )
        .execute(pool)
        .await?;

        // The unique name is what makes find-or-create of the attendance
        // aspect safe under concurrent first use.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS aspects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                polarity TEXT NOT NULL CHECK (polarity IN ('positive', 'negative', 'neutral')),
                input_method TEXT NOT NULL CHECK (input_method IN ('manual', 'qr', 'select')),
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS aspect_rules (
                id TEXT PRIMARY KEY,
                aspect_id TEXT NOT NULL,
                name TEXT NOT NULL,
                point INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (aspect_id) REFERENCES aspects (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS staff (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                class_id TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (class_id) REFERENCES classes (id) ON DELETE SET NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL,
                class_id TEXT,
                aspect_id TEXT,
                rule_id TEXT,
                point INTEGER NOT NULL,
                input_date TEXT NOT NULL,
                note TEXT,
                input_by TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (student_id) REFERENCES students (id) ON DELETE CASCADE,
                FOREIGN KEY (class_id) REFERENCES classes (id) ON DELETE SET NULL,
                FOREIGN KEY (aspect_id) REFERENCES aspects (id) ON DELETE SET NULL,
                FOREIGN KEY (rule_id) REFERENCES aspect_rules (id) ON DELETE SET NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_records_input_date
            ON records(input_date DESC);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_records_class_id
            ON records(class_id);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_records_aspect_id
            ON records(aspect_id);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type SettingsRepository = SettingsRepository;
    type ClassRepository = ClassRepository;
    type StudentRepository = StudentRepository;
    type AspectRepository = AspectRepository;
    type RecordRepository = RecordRepository;
    type StaffRepository = StaffRepository;

    fn create_settings_repository(&self) -> Self::SettingsRepository {
        SettingsRepository::new(self.clone())
    }

    fn create_class_repository(&self) -> Self::ClassRepository {
        ClassRepository::new(self.clone())
    }

    fn create_student_repository(&self) -> Self::StudentRepository {
        StudentRepository::new(self.clone())
    }

    fn create_aspect_repository(&self) -> Self::AspectRepository {
        AspectRepository::new(self.clone())
    }

    fn create_record_repository(&self) -> Self::RecordRepository {
        RecordRepository::new(self.clone())
    }

    fn create_staff_repository(&self) -> Self::StaffRepository {
        StaffRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let db = DbConnection::init_test().await.unwrap();
        DbConnection::setup_schema(db.pool()).await.unwrap();
        DbConnection::setup_schema(db.pool()).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_database_is_created_on_first_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poin.db");
        let url = format!("sqlite:{}", path.display());

        let db = DbConnection::new(&url).await.unwrap();
        assert!(path.exists());
        db.close().await;

        // Reopening an existing file keeps working
        DbConnection::new(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_pool_rejects_queries() {
        let db = DbConnection::init_test().await.unwrap();
        db.close().await;
        assert!(sqlx::query("SELECT 1").execute(db.pool()).await.is_err());
    }
}
