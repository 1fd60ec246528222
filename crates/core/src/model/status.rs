use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Where a learner stands on a single step of the curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Not reachable yet; navigation to the step's route is refused.
    Locked,
    /// Reachable but not completed.
    Unlocked,
    /// Completed. Stays reachable.
    Finished,
}

impl StepStatus {
    /// The literal used in the persisted record.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Locked => "locked",
            StepStatus::Unlocked => "unlocked",
            StepStatus::Finished => "finished",
        }
    }

    /// Whether navigation to a step in this status is allowed.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        !matches!(self, StepStatus::Locked)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid step status: {0}")]
pub struct StepStatusParseError(pub String);

impl FromStr for StepStatus {
    type Err = StepStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "locked" => Ok(StepStatus::Locked),
            "unlocked" => Ok(StepStatus::Unlocked),
            "finished" => Ok(StepStatus::Finished),
            other => Err(StepStatusParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_persisted_literals() {
        assert_eq!("locked".parse::<StepStatus>().unwrap(), StepStatus::Locked);
        assert_eq!(
            " unlocked ".parse::<StepStatus>().unwrap(),
            StepStatus::Unlocked
        );
        assert_eq!(
            "finished".parse::<StepStatus>().unwrap(),
            StepStatus::Finished
        );
    }

    #[test]
    fn rejects_unknown_literal() {
        let err = "done".parse::<StepStatus>().unwrap_err();
        assert_eq!(err, StepStatusParseError("done".into()));
    }

    #[test]
    fn serializes_as_lowercase_string() {
        let json = serde_json::to_string(&StepStatus::Unlocked).unwrap();
        assert_eq!(json, "\"unlocked\"");
    }

    #[test]
    fn only_locked_is_inaccessible() {
        assert!(!StepStatus::Locked.is_accessible());
        assert!(StepStatus::Unlocked.is_accessible());
        assert!(StepStatus::Finished.is_accessible());
    }
}
