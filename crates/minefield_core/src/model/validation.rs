//! Field-level validation failures shared by every model.

use super::ids::IdError;
use thiserror::Error;

/// Reason a value cannot become (or remain) a model record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: i64 },
    #[error("{field} value {value} does not fit in 32 bits")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("timestamp {millis} ms is outside years 0001..=9999")]
    Timestamp { millis: i64 },
    #[error("invalid {grid} value {value} at row {row}, column {col}")]
    GridValue {
        grid: &'static str,
        row: usize,
        col: usize,
        value: i64,
    },
    #[error("{grid} is not rectangular: row {row} has {found} columns, expected {expected}")]
    RaggedGrid {
        grid: &'static str,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error(
        "grid dimensions differ: bombMap is {bomb_rows}x{bomb_cols}, userInputs is {input_rows}x{input_cols}"
    )]
    DimensionMismatch {
        bomb_rows: usize,
        bomb_cols: usize,
        input_rows: usize,
        input_cols: usize,
    },
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("invalid email `{0}`")]
    Email(String),
}

/// Checks a store integer is a non-negative `u32`.
pub fn non_negative(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field, value })
}
