use async_trait::async_trait;
use atlas_core::model::{ProgressRecord, StepStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::codec::{decode_progress, encode_progress};

/// Key under which the override sequence is persisted.
pub const PROGRESS_KEY: &str = "sketch-atlas.progress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the persisted override sequence.
///
/// Implementations store the whole sequence under [`PROGRESS_KEY`] in a
/// single write.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the persisted slots as stored, without padding or truncation.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value is malformed,
    /// or other storage errors.
    async fn load_progress(&self) -> Result<Option<Vec<Option<StepStatus>>>, StorageError>;

    /// Persist the full sequence, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;

    /// Remove the persisted sequence.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be removed.
    async fn clear_progress(&self) -> Result<(), StorageError>;
}

/// Simple in-memory key-value repository for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a raw value under `key`, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.into());
        Ok(())
    }

    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Option<Vec<Option<StepStatus>>>, StorageError> {
        self.get_raw(PROGRESS_KEY)?
            .map(|raw| decode_progress(&raw))
            .transpose()
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let raw = encode_progress(record)?;
        self.put_raw(PROGRESS_KEY, raw)
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(PROGRESS_KEY);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_record_loads_as_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_progress().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn round_trips_record() {
        let repo = InMemoryRepository::new();
        let mut record = ProgressRecord::new(8);
        record.set(0, StepStatus::Finished).unwrap();
        record.set(1, StepStatus::Unlocked).unwrap();
        repo.save_progress(&record).await.unwrap();

        let raw = repo.get_raw(PROGRESS_KEY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"["finished","unlocked",null,null,null,null,null,null]"#
        );

        let slots = repo.load_progress().await.unwrap().unwrap();
        assert_eq!(ProgressRecord::from_slots(slots, 8), record);
    }

    #[tokio::test]
    async fn clear_removes_record() {
        let repo = InMemoryRepository::new();
        repo.save_progress(&ProgressRecord::new(2)).await.unwrap();
        repo.clear_progress().await.unwrap();
        assert!(repo.load_progress().await.unwrap().is_none());
    }
}
