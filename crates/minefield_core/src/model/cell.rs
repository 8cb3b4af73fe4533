//! Cell domain model.
//!
//! # Responsibility
//! - Describe one opened board cell as persisted in the `cells` table.
//!
//! # Invariants
//! - `(x, y)` is the position key; at most one stored cell per position.
//! - Numeric fields are non-negative by construction (`u32`).
//! - `when_opened` is Unix epoch milliseconds.

use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// Position key of a cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub x: u32,
    pub y: u32,
}

impl CellPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// One opened cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub is_bomb: bool,
    /// Typically the adjacent-bomb count, computed by the caller.
    pub cell_value: u32,
    /// Players credited with opening this cell, `None` for system cells.
    pub who_opened: Option<Vec<UserId>>,
    /// Unix epoch milliseconds.
    pub when_opened: i64,
    /// `true` when a player opened the cell, `false` for system/default cells.
    pub is_user_input: bool,
}

impl Cell {
    /// Creates a cell opened by a single player.
    pub fn opened_by(pos: CellPos, user: UserId, cell_value: u32, when_opened: i64) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            is_bomb: false,
            cell_value,
            who_opened: Some(vec![user]),
            when_opened,
            is_user_input: true,
        }
    }

    pub fn pos(&self) -> CellPos {
        CellPos::new(self.x, self.y)
    }
}
