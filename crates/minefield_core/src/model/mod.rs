//! Domain models for board persistence.
//!
//! # Responsibility
//! - Define the plain records handed to callers after validation.
//! - Own id and field validators used by the repository mappers.
//!
//! # Invariants
//! - A constructed model value is always valid; invalid rows never become
//!   model values.
//!
//! # See also
//! - `repo` for the row-to-model mappers.

pub mod cell;
pub mod game;
pub mod ids;
pub mod task;
pub mod user;
pub mod validation;
