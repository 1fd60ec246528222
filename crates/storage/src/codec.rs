//! JSON encoding of the persisted override sequence.
//!
//! The stored value is an array whose elements are `null` or one of the
//! status literals, e.g. `["finished",null,"unlocked"]`.

use atlas_core::model::{ProgressRecord, StepStatus};
use serde_json::Value;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Encode a record as its JSON array form.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_progress(record: &ProgressRecord) -> Result<String, StorageError> {
    serde_json::to_string(record).map_err(ser)
}

/// Decode persisted slots without enforcing a length.
///
/// Elements that are neither `null` nor a known status literal decode as
/// absent and are logged.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the value is not a JSON array.
pub fn decode_progress(raw: &str) -> Result<Vec<Option<StepStatus>>, StorageError> {
    let value: Value = serde_json::from_str(raw).map_err(ser)?;
    let Value::Array(items) = value else {
        return Err(StorageError::Serialization(
            "progress record is not an array".into(),
        ));
    };

    let slots = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Null => None,
            Value::String(ref literal) => match literal.parse::<StepStatus>() {
                Ok(status) => Some(status),
                Err(err) => {
                    tracing::warn!(index, %err, "ignoring unknown persisted step status");
                    None
                }
            },
            other => {
                tracing::warn!(index, value = %other, "ignoring non-string persisted step status");
                None
            }
        })
        .collect();
    Ok(slots)
}
