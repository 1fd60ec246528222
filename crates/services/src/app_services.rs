use std::sync::Arc;

use atlas_core::curriculum;
use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// Assembles app-facing services for one session.
///
/// The progress store lives exactly as long as this value; nothing is kept in
/// process-wide state.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the first-step
    /// bootstrap fails.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage).await
    }

    /// Build services backed by volatile in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the first-step bootstrap fails.
    pub async fn in_memory() -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory()).await
    }

    /// Build services over an existing storage aggregate.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if progress cannot be loaded or bootstrapped.
    pub async fn from_storage(storage: Storage) -> Result<Self, AppServicesError> {
        let progress =
            ProgressService::load(curriculum::steps(), Arc::clone(&storage.progress)).await?;
        progress.ensure_first_step_unlocked().await?;
        Ok(Self {
            progress: Arc::new(progress),
        })
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_core::model::StepStatus;

    #[tokio::test]
    async fn in_memory_services_start_with_first_step_open() {
        let services = AppServices::in_memory().await.unwrap();
        let progress = services.progress();
        assert_eq!(progress.status(0), Some(StepStatus::Unlocked));
        assert_eq!(progress.step_count(), curriculum::STEP_COUNT);
    }
}
