use serde::Serialize;

use crate::model::{LearningStep, ProgressRecord, StepStatus};

/// A curriculum step paired with its effective status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathEntry {
    pub index: usize,
    #[serde(flatten)]
    pub step: LearningStep,
    pub status: StepStatus,
}

impl PathEntry {
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.status.is_accessible()
    }
}

/// Ordered view-model consumed by the roadmap and home views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LearningPath {
    entries: Vec<PathEntry>,
}

impl LearningPath {
    #[must_use]
    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PathEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First step that is reachable but not yet finished.
    #[must_use]
    pub fn next_step(&self) -> Option<&PathEntry> {
        self.entries
            .iter()
            .find(|entry| entry.status == StepStatus::Unlocked)
    }

    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status == StepStatus::Finished)
            .count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.entries.is_empty() && self.finished_count() == self.entries.len()
    }
}

/// Merge static step metadata with the override sequence.
///
/// Pure: the same inputs always produce the same path. A missing or absent
/// override falls back to the step's `default_status`.
#[must_use]
pub fn derive_learning_path(steps: &[LearningStep], overrides: &ProgressRecord) -> LearningPath {
    let entries = steps
        .iter()
        .enumerate()
        .map(|(index, step)| PathEntry {
            index,
            step: *step,
            status: overrides
                .slots()
                .get(index)
                .copied()
                .flatten()
                .unwrap_or(step.default_status),
        })
        .collect();
    LearningPath { entries }
}
