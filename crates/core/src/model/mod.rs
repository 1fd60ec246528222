mod path;
mod progress;
mod status;
mod step;

pub use path::{LearningPath, PathEntry, derive_learning_path};
pub use progress::{ProgressRecord, StepIndexError};
pub use status::{StepStatus, StepStatusParseError};
pub use step::{LearningStep, StepVisual};
