use std::sync::{Arc, PoisonError, RwLock};

use atlas_core::model::{
    LearningPath, LearningStep, ProgressRecord, StepStatus, derive_learning_path,
};
use storage::repository::{ProgressRepository, StorageError};
use tokio::sync::Mutex;

use crate::error::ProgressServiceError;

#[derive(Debug, Clone)]
struct Snapshot {
    record: ProgressRecord,
    revision: u64,
}

/// Single source of truth for per-step learning progress.
///
/// Reads are served from memory. Every mutation builds its new record from the
/// latest committed one and persists it in a single write before the change
/// becomes visible. Out-of-range indices are logged and ignored.
pub struct ProgressService {
    steps: &'static [LearningStep],
    repo: Arc<dyn ProgressRepository>,
    state: RwLock<Snapshot>,
    writes: Mutex<()>,
}

impl ProgressService {
    /// Load persisted progress for `steps`, padding or truncating to fit.
    ///
    /// A malformed persisted value is logged and replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the repository cannot be read.
    pub async fn load(
        steps: &'static [LearningStep],
        repo: Arc<dyn ProgressRepository>,
    ) -> Result<Self, ProgressServiceError> {
        let record = match repo.load_progress().await {
            Ok(Some(slots)) => {
                if slots.len() != steps.len() {
                    tracing::debug!(
                        persisted = slots.len(),
                        step_count = steps.len(),
                        "resizing persisted progress"
                    );
                }
                ProgressRecord::from_slots(slots, steps.len())
            }
            Ok(None) => ProgressRecord::new(steps.len()),
            Err(StorageError::Serialization(msg)) => {
                tracing::warn!(error = %msg, "discarding malformed persisted progress");
                ProgressRecord::new(steps.len())
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            steps,
            repo,
            state: RwLock::new(Snapshot {
                record,
                revision: 0,
            }),
            writes: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn steps(&self) -> &'static [LearningStep] {
        self.steps
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Bumped on every committed mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.snapshot().revision
    }

    /// Copy of the current override sequence.
    #[must_use]
    pub fn overrides(&self) -> ProgressRecord {
        self.snapshot().record
    }

    /// Effective status of step `index`, or `None` if the index is invalid.
    #[must_use]
    pub fn status(&self, index: usize) -> Option<StepStatus> {
        if index >= self.steps.len() {
            self.warn_out_of_range("status", index);
            return None;
        }
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        effective_status(self.steps, &state.record, index)
    }

    /// Current learning path for the views.
    #[must_use]
    pub fn learning_path(&self) -> LearningPath {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        derive_learning_path(self.steps, &state.record)
    }

    /// Route to navigate to when the learner activates step `index`.
    ///
    /// Returns `None` for locked steps and invalid indices.
    #[must_use]
    pub fn activate(&self, index: usize) -> Option<&'static str> {
        let status = self.status(index)?;
        if status.is_accessible() {
            Some(self.steps[index].route)
        } else {
            tracing::debug!(index, "refusing navigation to locked step");
            None
        }
    }

    /// Override the status of one step and persist.
    ///
    /// Returns `Ok(false)` without touching state if `index` is invalid.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails; the
    /// in-memory state is left unchanged in that case.
    pub async fn set_status(
        &self,
        index: usize,
        status: StepStatus,
    ) -> Result<bool, ProgressServiceError> {
        if index >= self.steps.len() {
            self.warn_out_of_range("set_status", index);
            return Ok(false);
        }
        let applied = self
            .commit(|record| usize::from(record.set(index, status).is_ok()))
            .await?;
        Ok(applied > 0)
    }

    /// Apply several overrides in list order and persist once.
    ///
    /// Later entries for the same index win. Invalid entries are logged and
    /// skipped; the rest still land. Returns the number of applied entries.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails; none of
    /// the updates are applied in that case.
    pub async fn set_statuses(
        &self,
        updates: &[(usize, StepStatus)],
    ) -> Result<usize, ProgressServiceError> {
        self.commit(|record| {
            let mut applied = 0;
            for &(index, status) in updates {
                match record.set(index, status) {
                    Ok(()) => applied += 1,
                    Err(err) => {
                        tracing::warn!(op = "set_statuses", %err, "ignoring out-of-range step index");
                    }
                }
            }
            applied
        })
        .await
    }

    /// Unlock step 0 if it is currently locked.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn ensure_first_step_unlocked(&self) -> Result<bool, ProgressServiceError> {
        if self.steps.is_empty() {
            return Ok(false);
        }
        let applied = self.commit(|record| self.unlock_in(record, 0)).await?;
        if applied > 0 {
            tracing::info!("unlocked first step");
        }
        Ok(applied > 0)
    }

    /// Move step `index` from locked to unlocked. Reachable steps are left as is.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn unlock(&self, index: usize) -> Result<bool, ProgressServiceError> {
        if index >= self.steps.len() {
            self.warn_out_of_range("unlock", index);
            return Ok(false);
        }
        let applied = self.commit(|record| self.unlock_in(record, index)).await?;
        Ok(applied > 0)
    }

    /// Mark step `index` finished and unlock the following step, in one write.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if persistence fails.
    pub async fn complete_step(&self, index: usize) -> Result<bool, ProgressServiceError> {
        if index >= self.steps.len() {
            self.warn_out_of_range("complete_step", index);
            return Ok(false);
        }
        let applied = self
            .commit(|record| {
                let mut applied = 0;
                if effective_status(self.steps, record, index) != Some(StepStatus::Finished)
                    && record.set(index, StepStatus::Finished).is_ok()
                {
                    applied += 1;
                }
                if index + 1 < self.steps.len() {
                    applied += self.unlock_in(record, index + 1);
                }
                applied
            })
            .await?;
        if applied > 0 {
            tracing::info!(index, "step completed");
        }
        Ok(applied > 0)
    }

    /// Drop all persisted progress and fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the record cannot be removed.
    pub async fn reset(&self) -> Result<(), ProgressServiceError> {
        let _guard = self.writes.lock().await;
        self.repo.clear_progress().await?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.record = ProgressRecord::new(self.steps.len());
        state.revision += 1;
        tracing::info!("progress reset");
        Ok(())
    }

    async fn commit<F>(&self, mutate: F) -> Result<usize, ProgressServiceError>
    where
        F: FnOnce(&mut ProgressRecord) -> usize + Send,
    {
        let _guard = self.writes.lock().await;
        let mut next = self.snapshot().record;
        let applied = mutate(&mut next);
        if applied == 0 {
            return Ok(0);
        }

        self.repo.save_progress(&next).await?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.record = next;
        state.revision += 1;
        Ok(applied)
    }

    fn unlock_in(&self, record: &mut ProgressRecord, index: usize) -> usize {
        if effective_status(self.steps, record, index) == Some(StepStatus::Locked) {
            usize::from(record.set(index, StepStatus::Unlocked).is_ok())
        } else {
            0
        }
    }

    fn snapshot(&self) -> Snapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn warn_out_of_range(&self, op: &'static str, index: usize) {
        tracing::warn!(
            op,
            index,
            step_count = self.steps.len(),
            "ignoring out-of-range step index"
        );
    }
}

fn effective_status(
    steps: &[LearningStep],
    record: &ProgressRecord,
    index: usize,
) -> Option<StepStatus> {
    let step = steps.get(index)?;
    Some(
        record
            .get(index)
            .ok()
            .flatten()
            .unwrap_or(step.default_status),
    )
}
