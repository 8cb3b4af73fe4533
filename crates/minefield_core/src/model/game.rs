//! Game board model.
//!
//! # Responsibility
//! - Hold the bomb layout and the per-cell player input grid of one board.
//!
//! # Invariants
//! - Both grids are rectangular and share the same dimensions.
//! - `bomb_map` is write-once; only `user_inputs` changes after creation.

use super::ids::GameId;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Bomb layout value for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum BombMark {
    Clear = 0,
    Bomb = 1,
}

/// Player input state for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum UserInput {
    Untouched = 0,
    Flagged = 1,
    Revealed = 2,
}

impl TryFrom<i64> for BombMark {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Clear),
            1 => Ok(Self::Bomb),
            other => Err(other),
        }
    }
}

impl From<BombMark> for i64 {
    fn from(value: BombMark) -> Self {
        value as i64
    }
}

impl TryFrom<i64> for UserInput {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Untouched),
            1 => Ok(Self::Flagged),
            2 => Ok(Self::Revealed),
            other => Err(other),
        }
    }
}

impl From<UserInput> for i64 {
    fn from(value: UserInput) -> Self {
        value as i64
    }
}

/// Persisted board state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawGame")]
pub struct Game {
    pub id: GameId,
    pub bomb_map: Vec<Vec<BombMark>>,
    pub user_inputs: Vec<Vec<UserInput>>,
}

/// Decoded shape before grid checks.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGame {
    id: GameId,
    bomb_map: Vec<Vec<BombMark>>,
    user_inputs: Vec<Vec<UserInput>>,
}

impl TryFrom<RawGame> for Game {
    type Error = ValidationError;

    fn try_from(raw: RawGame) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.bomb_map, raw.user_inputs)
    }
}

impl Game {
    /// Builds a game after checking grid shapes.
    pub fn new(
        id: GameId,
        bomb_map: Vec<Vec<BombMark>>,
        user_inputs: Vec<Vec<UserInput>>,
    ) -> Result<Self, ValidationError> {
        let game = Self {
            id,
            bomb_map,
            user_inputs,
        };
        game.validate()?;
        Ok(game)
    }

    /// Starts a board with every position untouched.
    pub fn fresh(id: GameId, bomb_map: Vec<Vec<BombMark>>) -> Result<Self, ValidationError> {
        let user_inputs = bomb_map
            .iter()
            .map(|row| vec![UserInput::Untouched; row.len()])
            .collect();
        Self::new(id, bomb_map, user_inputs)
    }

    /// Checks both grids are rectangular and equally sized.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (bomb_rows, bomb_cols) = grid_dimensions("bombMap", &self.bomb_map)?;
        let (input_rows, input_cols) = grid_dimensions("userInputs", &self.user_inputs)?;
        if (bomb_rows, bomb_cols) != (input_rows, input_cols) {
            return Err(ValidationError::DimensionMismatch {
                bomb_rows,
                bomb_cols,
                input_rows,
                input_cols,
            });
        }
        Ok(())
    }

    /// Returns `(rows, columns)` of the board.
    pub fn dimensions(&self) -> (usize, usize) {
        (
            self.bomb_map.len(),
            self.bomb_map.first().map_or(0, Vec::len),
        )
    }

    pub fn bomb_count(&self) -> usize {
        self.bomb_map
            .iter()
            .flatten()
            .filter(|mark| **mark == BombMark::Bomb)
            .count()
    }
}

fn grid_dimensions<T>(grid: &'static str, rows: &[Vec<T>]) -> Result<(usize, usize), ValidationError> {
    let expected = rows.first().map_or(0, Vec::len);
    for (row, values) in rows.iter().enumerate() {
        if values.len() != expected {
            return Err(ValidationError::RaggedGrid {
                grid,
                row,
                found: values.len(),
                expected,
            });
        }
    }
    Ok((rows.len(), expected))
}

/// Converts a raw integer grid, reporting the first out-of-range value.
pub fn parse_grid<T>(grid: &'static str, raw: &[Vec<i64>]) -> Result<Vec<Vec<T>>, ValidationError>
where
    T: TryFrom<i64, Error = i64>,
{
    raw.iter()
        .enumerate()
        .map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(|(col, value)| {
                    T::try_from(*value).map_err(|value| ValidationError::GridValue {
                        grid,
                        row,
                        col,
                        value,
                    })
                })
                .collect()
        })
        .collect()
}

/// Flattens a typed grid back to store integers.
pub fn encode_grid<T>(grid: &[Vec<T>]) -> Vec<Vec<i64>>
where
    T: Copy + Into<i64>,
{
    grid.iter()
        .map(|row| row.iter().map(|value| (*value).into()).collect())
        .collect()
}
