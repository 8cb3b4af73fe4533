//! Game repository and row mapper.
//!
//! # Invariants
//! - `save` is an upsert keyed by game id whose update payload carries only
//!   `user_inputs`; the bomb map written on first insert never changes.
//! - `find` returns whichever row the store yields first. Callers keep a
//!   single game row alive.

use super::degrade::or_sentinel;
use super::{RepoError, RepoResult};
use crate::client::{GameRow, GameUpdate, Games, MutableTableClient, Table};
use crate::model::game::{encode_grid, parse_grid, Game};
use crate::model::ids::GameId;
use crate::model::validation::ValidationError;

/// Persistence facade for the `games` table.
#[derive(Clone)]
pub struct GameRepository<C> {
    client: C,
}

impl<C: MutableTableClient<Games>> GameRepository<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Inserts or updates `game`; `None` on any failure.
    pub async fn save(&self, game: &Game) -> Option<Game> {
        or_sentinel("game_save", self.try_save(game).await.map(Some))
    }

    pub async fn try_save(&self, game: &Game) -> RepoResult<Game> {
        game.validate().map_err(RepoError::invalid_input("game"))?;
        let create = GameRow {
            id: game.id.to_string(),
            bomb_map: encode_grid(&game.bomb_map),
            user_inputs: encode_grid(&game.user_inputs),
        };
        let update = GameUpdate {
            user_inputs: encode_grid(&game.user_inputs),
        };
        let stored = self
            .client
            .upsert(game.id.to_string(), update, create)
            .await?;
        Game::try_from(stored).map_err(RepoError::invalid_row(Games::NAME))
    }

    /// The active game; `None` when absent or on failure.
    pub async fn find(&self) -> Option<Game> {
        or_sentinel("game_find", self.try_find().await)
    }

    pub async fn try_find(&self) -> RepoResult<Option<Game>> {
        match self.client.find_first().await? {
            Some(row) => Game::try_from(row)
                .map(Some)
                .map_err(RepoError::invalid_row(Games::NAME)),
            None => Ok(None),
        }
    }
}

impl TryFrom<GameRow> for Game {
    type Error = ValidationError;

    fn try_from(row: GameRow) -> Result<Self, Self::Error> {
        Game::new(
            GameId::parse(row.id)?,
            parse_grid("bombMap", &row.bomb_map)?,
            parse_grid("userInputs", &row.user_inputs)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::client::GameRow;
    use crate::model::game::{BombMark, Game, UserInput};
    use crate::model::validation::ValidationError;

    fn row(bomb_map: Vec<Vec<i64>>, user_inputs: Vec<Vec<i64>>) -> GameRow {
        GameRow {
            id: "game-1".to_string(),
            bomb_map,
            user_inputs,
        }
    }

    #[test]
    fn mapper_builds_typed_grids() {
        let game = Game::try_from(row(vec![vec![0, 1]], vec![vec![2, 1]])).unwrap();
        assert_eq!(game.bomb_map, vec![vec![BombMark::Clear, BombMark::Bomb]]);
        assert_eq!(
            game.user_inputs,
            vec![vec![UserInput::Revealed, UserInput::Flagged]]
        );
    }

    #[test]
    fn mapper_rejects_values_outside_each_grid_alphabet() {
        assert_eq!(
            Game::try_from(row(vec![vec![0, 2]], vec![vec![0, 0]])).unwrap_err(),
            ValidationError::GridValue {
                grid: "bombMap",
                row: 0,
                col: 1,
                value: 2
            }
        );
        assert!(matches!(
            Game::try_from(row(vec![vec![0]], vec![vec![3]])),
            Err(ValidationError::GridValue {
                grid: "userInputs",
                ..
            })
        ));
    }

    #[test]
    fn mapper_rejects_mismatched_dimensions() {
        assert!(matches!(
            Game::try_from(row(vec![vec![0, 0]], vec![vec![0]])),
            Err(ValidationError::DimensionMismatch { .. })
        ));
    }
}
