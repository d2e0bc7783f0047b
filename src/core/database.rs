// src/core/database.rs
//! SQLite storage backend - one row per storage slot

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::path::Path;

use crate::core::storage::StorageBackend;
use crate::core::FsOps;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create new database connection with automatic setup
    pub async fn new(database_path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        app_log!(
            info,
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get pool reference for custom operations
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS storage_slots (
                slot TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create storage_slots table")?;

        app_log!(info, "Database migrations completed");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for Database {
    async fn read(&self, slot: &str) -> Result<Option<String>> {
        let value: Option<(String,)> =
            sqlx::query_as("SELECT value FROM storage_slots WHERE slot = ?")
                .bind(slot)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Failed to read storage slot {}", slot))?;

        Ok(value.map(|(value,)| value))
    }

    async fn write(&self, slot: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO storage_slots (slot, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(slot) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(slot)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write storage slot {}", slot))?;

        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM storage_slots WHERE slot = ?")
            .bind(slot)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to remove storage slot {}", slot))?;

        if result.rows_affected() > 0 {
            app_log!(info, "Removed storage slot: {}", slot);
        }
        Ok(())
    }
}
