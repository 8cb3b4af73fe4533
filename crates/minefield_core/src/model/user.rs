//! User and player models.
//!
//! `User` is the persisted account record. `Player` is a view model built by
//! callers for rendering and is never stored by this crate.

use super::ids::UserId;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl User {
    /// Checks the email has a plausible `local@domain` shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::Empty { field: "email" });
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::Email(email.to_string())),
    }
}

/// Player as shown on the board, including live score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: UserId,
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub score: u32,
    pub is_live: bool,
}

impl Player {
    /// Creates a live player with zero score at the given position.
    pub fn spawn(user: &User, x: u32, y: u32) -> Self {
        Self {
            id: user.id.clone(),
            name: user
                .display_name
                .clone()
                .unwrap_or_else(|| user.email.clone()),
            x,
            y,
            score: 0,
            is_live: true,
        }
    }
}
