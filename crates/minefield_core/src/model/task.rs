//! Task model.

use super::ids::TaskId;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Todo-style task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub label: String,
    pub done: bool,
    /// Unix epoch milliseconds.
    pub created: i64,
}

impl Task {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_label(&self.label)
    }
}

pub(crate) fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        return Err(ValidationError::Empty { field: "label" });
    }
    Ok(())
}
