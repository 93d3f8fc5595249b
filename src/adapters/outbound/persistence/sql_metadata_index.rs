use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::debug;

use crate::{
    domain::{
        errors::{MetadataError, MetadataResult, ValidationError},
        models::MetadataRecord,
        value_objects::{ObjectKey, OwnerId, VersionId},
    },
    ports::repositories::MetadataIndex,
};

/// SQL-based implementation of MetadataIndex using SQLite
#[derive(Clone)]
pub struct SqlMetadataIndex {
    pool: SqlitePool,
    table: String,
}

impl SqlMetadataIndex {
    /// `table` is interpolated into statements, so only `[A-Za-z0-9_]` is accepted
    pub fn new(pool: SqlitePool, table: impl Into<String>) -> Result<Self, ValidationError> {
        let table = table.into();
        let valid = !table.is_empty()
            && !table.starts_with(|c: char| c.is_ascii_digit())
            && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid {
            return Err(ValidationError::InvalidField {
                field: "table_name".to_string(),
                value: table,
                expected: "letters, digits and underscores".to_string(),
            });
        }

        Ok(Self { pool, table })
    }

    /// Initialize database tables
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                owner_id TEXT NOT NULL,
                file_key TEXT NOT NULL,
                file_name TEXT NOT NULL,
                current_version_id TEXT,
                size_bytes INTEGER,
                mime_type TEXT,
                last_write_at TEXT NOT NULL,
                PRIMARY KEY (owner_id, file_key)
            )
            "#,
            table = self.table
        ))
        .execute(&self.pool)
        .await?;

        debug!(table = %self.table, "Metadata index table ready");
        Ok(())
    }

    fn record_from_row(row: &SqliteRow) -> MetadataResult<MetadataRecord> {
        let current_version_id = row
            .try_get::<Option<String>, _>("current_version_id")?
            .map(VersionId::new)
            .transpose()
            .map_err(|e| MetadataError::sync_failure(format!("stored version id: {}", e)))?;

        Ok(MetadataRecord {
            file_name: row.try_get("file_name")?,
            current_version_id,
            size_bytes: row
                .try_get::<Option<i64>, _>("size_bytes")?
                .map(|size| size as u64),
            mime_type: row.try_get("mime_type")?,
            last_write_at: row.try_get("last_write_at")?,
        })
    }
}

#[async_trait]
impl MetadataIndex for SqlMetadataIndex {
    async fn put(
        &self,
        owner: &OwnerId,
        file_key: &ObjectKey,
        record: &MetadataRecord,
    ) -> MetadataResult<()> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {table} (
                owner_id, file_key, file_name, current_version_id,
                size_bytes, mime_type, last_write_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (owner_id, file_key)
            DO UPDATE SET
                file_name = excluded.file_name,
                current_version_id = excluded.current_version_id,
                size_bytes = excluded.size_bytes,
                mime_type = excluded.mime_type,
                last_write_at = excluded.last_write_at
            "#,
            table = self.table
        ))
        .bind(owner.as_str())
        .bind(file_key.as_str())
        .bind(&record.file_name)
        .bind(record.current_version_id.as_ref().map(VersionId::as_str))
        .bind(record.size_bytes.map(|size| size as i64))
        .bind(&record.mime_type)
        .bind(record.last_write_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(
        &self,
        owner: &OwnerId,
        file_key: &ObjectKey,
    ) -> MetadataResult<Option<MetadataRecord>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT file_name, current_version_id, size_bytes, mime_type, last_write_at
            FROM {table}
            WHERE owner_id = ? AND file_key = ?
            "#,
            table = self.table
        ))
        .bind(owner.as_str())
        .bind(file_key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn delete(&self, owner: &OwnerId, file_key: &ObjectKey) -> MetadataResult<()> {
        sqlx::query(&format!(
            "DELETE FROM {table} WHERE owner_id = ? AND file_key = ?",
            table = self.table
        ))
        .bind(owner.as_str())
        .bind(file_key.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_current_version(
        &self,
        owner: &OwnerId,
        file_key: &ObjectKey,
        version_id: &VersionId,
        at: DateTime<Utc>,
    ) -> MetadataResult<()> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {table} (owner_id, file_key, file_name, current_version_id, last_write_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (owner_id, file_key)
            DO UPDATE SET
                current_version_id = excluded.current_version_id,
                last_write_at = excluded.last_write_at
            "#,
            table = self.table
        ))
        .bind(owner.as_str())
        .bind(file_key.as_str())
        .bind(file_key.file_name())
        .bind(version_id.as_str())
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
