//! Cell repository and row mapper.
//!
//! # Responsibility
//! - Create, query and delete opened cells keyed by position.
//! - Convert epoch-millisecond timestamps to store timestamps and back.
//!
//! # Invariants
//! - `create` propagates every failure; all other default operations
//!   degrade failures to empty sentinels.
//! - `x`, `y` and `cell_value` of every returned cell were validated >= 0.
//! - `find_all_of_player` compares the whole stored opener list against
//!   `[user_id]`; a cell opened by several players never matches one of
//!   them.
//! - `find_older` returns newest cells first.

use super::degrade::or_sentinel;
use super::{map_rows, RepoError, RepoResult};
use crate::client::{CellField, CellFilter, CellKey, CellRow, Cells, FindMany, Table, TableClient};
use crate::model::cell::Cell;
use crate::model::ids::UserId;
use crate::model::validation::{non_negative, ValidationError};
use chrono::{DateTime, TimeZone, Utc};

/// Persistence facade for the `cells` table.
#[derive(Clone)]
pub struct CellRepository<C> {
    client: C,
}

impl<C: TableClient<Cells>> CellRepository<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Inserts `cell` and returns the stored, re-validated value.
    ///
    /// # Errors
    /// - `RepoError::InvalidInput` when `when_opened` is not representable.
    /// - `RepoError::Store` with `StoreError::UniqueViolation` when the
    ///   position is already taken.
    pub async fn create(&self, cell: &Cell) -> RepoResult<Cell> {
        let row = cell_to_row(cell).map_err(RepoError::invalid_input("cell"))?;
        let stored = self.client.create(row).await?;
        Cell::try_from(stored).map_err(RepoError::invalid_row(Cells::NAME))
    }

    /// All cells in `(x, y)` scan order; empty on failure.
    pub async fn find_all(&self) -> Vec<Cell> {
        or_sentinel("cell_find_all", self.try_find_all().await)
    }

    pub async fn try_find_all(&self) -> RepoResult<Vec<Cell>> {
        let query = FindMany::<Cells>::all().asc(CellField::X).asc(CellField::Y);
        let rows = self.client.find_many(query).await?;
        map_rows(Cells::NAME, rows, Cell::try_from)
    }

    /// Cells whose opener list is exactly `[user_id]`; empty on failure.
    pub async fn find_all_of_player(&self, user_id: &UserId) -> Vec<Cell> {
        or_sentinel(
            "cell_find_all_of_player",
            self.try_find_all_of_player(user_id).await,
        )
    }

    pub async fn try_find_all_of_player(&self, user_id: &UserId) -> RepoResult<Vec<Cell>> {
        let query = FindMany::<Cells>::all().filter(CellFilter {
            who_opened: Some(vec![user_id.to_string()]),
            ..CellFilter::default()
        });
        let rows = self.client.find_many(query).await?;
        map_rows(Cells::NAME, rows, Cell::try_from)
    }

    /// Cell at `(x, y)`; `None` when absent or on failure.
    pub async fn find(&self, x: u32, y: u32) -> Option<Cell> {
        or_sentinel("cell_find", self.try_find(x, y).await)
    }

    pub async fn try_find(&self, x: u32, y: u32) -> RepoResult<Option<Cell>> {
        let key = CellKey {
            x: i64::from(x),
            y: i64::from(y),
        };
        match self.client.find_unique(key).await? {
            Some(row) => Cell::try_from(row)
                .map(Some)
                .map_err(RepoError::invalid_row(Cells::NAME)),
            None => Ok(None),
        }
    }

    /// All cells, most recently opened first; empty on failure.
    pub async fn find_older(&self) -> Vec<Cell> {
        or_sentinel("cell_find_older", self.try_find_older().await)
    }

    pub async fn try_find_older(&self) -> RepoResult<Vec<Cell>> {
        let query = FindMany::<Cells>::all().desc(CellField::WhenOpened);
        let rows = self.client.find_many(query).await?;
        map_rows(Cells::NAME, rows, Cell::try_from)
    }

    /// Cells opened by a player rather than the system; empty on failure.
    pub async fn find_all_user_inputted(&self) -> Vec<Cell> {
        or_sentinel(
            "cell_find_all_user_inputted",
            self.try_find_all_user_inputted().await,
        )
    }

    pub async fn try_find_all_user_inputted(&self) -> RepoResult<Vec<Cell>> {
        let query = FindMany::<Cells>::all().filter(CellFilter {
            is_user_input: Some(true),
            ..CellFilter::default()
        });
        let rows = self.client.find_many(query).await?;
        map_rows(Cells::NAME, rows, Cell::try_from)
    }

    /// Removes the cell at `(x, y)`. Missing rows and failures are logged
    /// and ignored.
    pub async fn delete(&self, x: u32, y: u32) {
        or_sentinel("cell_delete", self.try_delete(x, y).await)
    }

    /// # Errors
    /// - `StoreError::RecordNotFound` when no cell exists at `(x, y)`.
    pub async fn try_delete(&self, x: u32, y: u32) -> RepoResult<()> {
        let key = CellKey {
            x: i64::from(x),
            y: i64::from(y),
        };
        self.client.delete(key).await?;
        Ok(())
    }
}

impl TryFrom<CellRow> for Cell {
    type Error = ValidationError;

    fn try_from(row: CellRow) -> Result<Self, Self::Error> {
        let who_opened = row
            .who_opened
            .map(|openers| {
                openers
                    .into_iter()
                    .map(UserId::parse)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            x: non_negative("x", row.x)?,
            y: non_negative("y", row.y)?,
            is_bomb: row.is_bomb,
            cell_value: non_negative("cellValue", row.cell_value)?,
            who_opened,
            when_opened: row.when_opened.timestamp_millis(),
            is_user_input: row.is_user_input,
        })
    }
}

fn cell_to_row(cell: &Cell) -> Result<CellRow, ValidationError> {
    Ok(CellRow {
        x: i64::from(cell.x),
        y: i64::from(cell.y),
        is_bomb: cell.is_bomb,
        cell_value: i64::from(cell.cell_value),
        who_opened: cell
            .who_opened
            .as_ref()
            .map(|openers| openers.iter().map(UserId::to_string).collect()),
        when_opened: millis_to_timestamp(cell.when_opened)?,
        is_user_input: cell.is_user_input,
    })
}

/// `0001-01-01T00:00:00.000Z`.
const MIN_STORED_MILLIS: i64 = -62_135_596_800_000;
/// `9999-12-31T23:59:59.999Z`.
const MAX_STORED_MILLIS: i64 = 253_402_300_799_999;

/// Converts epoch milliseconds, limited to four-digit years so the stored
/// text reads back and sorts by time.
pub(crate) fn millis_to_timestamp(millis: i64) -> Result<DateTime<Utc>, ValidationError> {
    if !(MIN_STORED_MILLIS..=MAX_STORED_MILLIS).contains(&millis) {
        return Err(ValidationError::Timestamp { millis });
    }
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(ValidationError::Timestamp { millis })
}
