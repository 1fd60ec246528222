use async_trait::async_trait;
use atlas_core::model::{ProgressRecord, StepStatus};
use sqlx::Row;

use crate::codec::{decode_progress, encode_progress};
use crate::repository::{PROGRESS_KEY, ProgressRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self) -> Result<Option<Vec<Option<StepStatus>>>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(PROGRESS_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        decode_progress(&raw).map(Some)
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let raw = encode_progress(record)?;
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(PROGRESS_KEY)
        .bind(raw)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(PROGRESS_KEY)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
