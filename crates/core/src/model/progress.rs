use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::StepStatus;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("step index {index} out of range (step count {step_count})")]
pub struct StepIndexError {
    pub index: usize,
    pub step_count: usize,
}

/// Per-step status overrides, index-aligned with the curriculum.
///
/// A `None` slot means the step's default status applies. The length is fixed
/// at construction and always matches the number of defined steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord {
    slots: Vec<Option<StepStatus>>,
}

impl ProgressRecord {
    /// All slots absent.
    #[must_use]
    pub fn new(step_count: usize) -> Self {
        Self {
            slots: vec![None; step_count],
        }
    }

    /// Build a record from persisted slots, padding with `None` or truncating
    /// so the result holds exactly `step_count` slots.
    #[must_use]
    pub fn from_slots(mut slots: Vec<Option<StepStatus>>, step_count: usize) -> Self {
        slots.resize(step_count, None);
        Self { slots }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<StepStatus>] {
        &self.slots
    }

    #[must_use]
    pub fn into_slots(self) -> Vec<Option<StepStatus>> {
        self.slots
    }

    /// The override stored for `index`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StepIndexError` if `index` is outside the record.
    pub fn get(&self, index: usize) -> Result<Option<StepStatus>, StepIndexError> {
        self.slots
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Replace the override at `index`, leaving every other slot untouched.
    ///
    /// # Errors
    ///
    /// Returns `StepIndexError` if `index` is outside the record.
    pub fn set(&mut self, index: usize, status: StepStatus) -> Result<(), StepIndexError> {
        let err = self.out_of_range(index);
        let slot = self.slots.get_mut(index).ok_or(err)?;
        *slot = Some(status);
        Ok(())
    }

    /// Whether `index` addresses a slot in this record.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index < self.slots.len()
    }

    fn out_of_range(&self, index: usize) -> StepIndexError {
        StepIndexError {
            index,
            step_count: self.slots.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_slots_are_padded_with_absent() {
        let record = ProgressRecord::from_slots(vec![Some(StepStatus::Finished)], 4);
        assert_eq!(
            record.slots(),
            &[Some(StepStatus::Finished), None, None, None]
        );
    }

    #[test]
    fn longer_slots_are_truncated() {
        let record = ProgressRecord::from_slots(
            vec![
                Some(StepStatus::Finished),
                Some(StepStatus::Unlocked),
                Some(StepStatus::Locked),
            ],
            2,
        );
        assert_eq!(
            record.slots(),
            &[Some(StepStatus::Finished), Some(StepStatus::Unlocked)]
        );
    }

    #[test]
    fn set_replaces_only_target_slot() {
        let mut record = ProgressRecord::new(3);
        record.set(1, StepStatus::Unlocked).unwrap();
        assert_eq!(record.slots(), &[None, Some(StepStatus::Unlocked), None]);
    }

    #[test]
    fn out_of_range_access_is_rejected_without_mutation() {
        let mut record = ProgressRecord::new(8);
        let err = record.set(99, StepStatus::Finished).unwrap_err();
        assert_eq!(
            err,
            StepIndexError {
                index: 99,
                step_count: 8
            }
        );
        assert!(record.get(8).is_err());
        assert_eq!(record, ProgressRecord::new(8));
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut record = ProgressRecord::new(3);
        record.set(2, StepStatus::Finished).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"[null,null,"finished"]"#);
    }
}
