//! Repository layer over the generic query client.
//!
//! # Responsibility
//! - Map store rows to validated models and back.
//! - Offer a checked surface (`try_*`) that separates absence, malformed
//!   rows and store failures.
//! - Offer the default surface that degrades failures to empty sentinels
//!   through [`degrade::or_sentinel`].
//!
//! # Invariants
//! - Every repository call issues exactly one client request.
//! - One malformed row fails the whole call; partial results are never
//!   returned.

use crate::client::StoreError;
use crate::model::validation::ValidationError;
use thiserror::Error;

pub mod cell_repo;
pub mod degrade;
pub mod game_repo;
pub mod task_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of a checked repository call.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The query client failed (connection, constraint, missing record).
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A stored row did not pass model validation.
    #[error("invalid `{table}` row: {source}")]
    InvalidRow {
        table: &'static str,
        #[source]
        source: ValidationError,
    },
    /// A caller-provided model could not be converted to a row.
    #[error("invalid {entity}: {source}")]
    InvalidInput {
        entity: &'static str,
        #[source]
        source: ValidationError,
    },
}

impl RepoError {
    pub(crate) fn invalid_row(table: &'static str) -> impl FnOnce(ValidationError) -> Self {
        move |source| Self::InvalidRow { table, source }
    }

    pub(crate) fn invalid_input(entity: &'static str) -> impl FnOnce(ValidationError) -> Self {
        move |source| Self::InvalidInput { entity, source }
    }

    /// Returns `true` when the store reported that no row matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::RecordNotFound { .. }))
    }
}

/// Maps every row, failing on the first invalid one.
pub(crate) fn map_rows<R, M>(
    table: &'static str,
    rows: Vec<R>,
    map: impl Fn(R) -> Result<M, ValidationError>,
) -> RepoResult<Vec<M>> {
    rows.into_iter()
        .map(|row| map(row).map_err(RepoError::invalid_row(table)))
        .collect()
}
