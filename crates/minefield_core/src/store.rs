//! Bundle of every repository over one shared client.

use crate::client::{Cells, Games, MutableTableClient, SqliteClient, TableClient, Tasks, Users};
use crate::config::StoreConfig;
use crate::db::DbResult;
use crate::repo::cell_repo::CellRepository;
use crate::repo::game_repo::GameRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::user_repo::UserRepository;

/// All repositories of the board database.
#[derive(Clone)]
pub struct Store<C> {
    pub cells: CellRepository<C>,
    pub games: GameRepository<C>,
    pub users: UserRepository<C>,
    pub tasks: TaskRepository<C>,
}

impl<C> Store<C>
where
    C: Clone
        + TableClient<Cells>
        + MutableTableClient<Games>
        + MutableTableClient<Users>
        + MutableTableClient<Tasks>,
{
    pub fn new(client: C) -> Self {
        Self {
            cells: CellRepository::new(client.clone()),
            games: GameRepository::new(client.clone()),
            users: UserRepository::new(client.clone()),
            tasks: TaskRepository::new(client),
        }
    }
}

impl Store<SqliteClient> {
    /// Opens the configured database file and wires every repository to it.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        Ok(Self::new(SqliteClient::open(&config.database_path)?))
    }

    /// In-memory store for tests and throwaway sessions.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(SqliteClient::open_in_memory()?))
    }
}
