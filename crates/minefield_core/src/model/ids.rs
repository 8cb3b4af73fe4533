//! Branded identifiers for users, games and tasks.
//!
//! # Responsibility
//! - Give each entity its own id type so signatures cannot mix them up.
//! - Validate raw strings coming from callers or from persisted rows.
//!
//! # Invariants
//! - Every id is 1..=128 characters drawn from `[A-Za-z0-9_-]`.
//! - Deserialization runs the same validation as `parse`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;

static ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,128}$").expect("valid id regex"));

/// Rejection reasons for raw id strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{kind} id cannot be empty")]
    Empty { kind: &'static str },
    #[error("invalid {kind} id `{value}`")]
    Malformed { kind: &'static str, value: String },
}

fn validate_id(kind: &'static str, value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if !ID_RE.is_match(value) {
        return Err(IdError::Malformed {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validates `value` and wraps it.
            pub fn parse(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                validate_id($kind, &value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

branded_id!(
    /// Identity of an authenticated player.
    UserId,
    "user"
);
branded_id!(
    /// Identity of a persisted board.
    GameId,
    "game"
);
branded_id!(
    /// Identity of a todo-style task.
    TaskId,
    "task"
);

impl GameId {
    /// Creates a fresh random game id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl TaskId {
    /// Creates a fresh random task id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
