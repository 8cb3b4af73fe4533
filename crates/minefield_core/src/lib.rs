//! Persistence layer for a multiplayer minesweeper board.
//! Typed repositories over a generic query client, with SQLite as the
//! bundled engine.

pub mod client;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use client::{SqliteClient, StoreError, StoreResult};
pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::cell::{Cell, CellPos};
pub use model::game::{BombMark, Game, UserInput};
pub use model::ids::{GameId, IdError, TaskId, UserId};
pub use model::task::Task;
pub use model::user::{Player, User};
pub use model::validation::ValidationError;
pub use repo::cell_repo::CellRepository;
pub use repo::game_repo::GameRepository;
pub use repo::task_repo::TaskRepository;
pub use repo::user_repo::UserRepository;
pub use repo::{RepoError, RepoResult};
pub use store::Store;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
