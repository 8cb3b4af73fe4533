//! Generic structured-query client contract.
//!
//! # Responsibility
//! - Describe per-table CRUD/upsert operations independent of the engine.
//! - Carry store-level rows, keys, filters and orderings, never models.
//!
//! # Invariants
//! - Clients do not validate rows; validation belongs to repository mappers.
//! - `delete` and `update` report `RecordNotFound` when no row matched.
//!
//! # See also
//! - `sqlite` for the SQLite-backed implementation.

pub mod sqlite;
pub mod tables;

use futures::future::BoxFuture;
use thiserror::Error;

pub use sqlite::SqliteClient;
pub use tables::{
    CellField, CellFilter, CellKey, CellRow, Cells, GameField, GameRow, GameUpdate, Games,
    TaskField, TaskRow, TaskUpdate, Tasks, UserField, UserRow, UserUpdate, Users,
};

/// Result alias for query client operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a query client, regardless of the underlying engine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on `{table}`")]
    UniqueViolation {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("no `{table}` record matched the given key")]
    RecordNotFound { table: &'static str },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to encode or decode `{table}.{column}`")]
    Codec {
        table: &'static str,
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("store connection lock poisoned")]
    Poisoned,
    #[error("store worker task failed")]
    Join(#[from] tokio::task::JoinError),
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Static description of one named table.
pub trait Table: Send + Sync + 'static {
    /// Table name used in logs and error messages.
    const NAME: &'static str;
    /// Row shape as stored.
    type Row: Send + 'static;
    /// Unique key accepted by `find_unique` and `delete`.
    type Key: Send + 'static;
    /// Structured `where` clause for `find_many`.
    type Filter: Default + Send + 'static;
    /// Orderable columns.
    type Field: Copy + Send + 'static;
}

/// Table that also accepts partial updates.
pub trait MutableTable: Table {
    type Update: Send + 'static;
}

/// Sort direction of one ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy<F> {
    pub field: F,
    pub direction: Direction,
}

/// Arguments of `find_many`.
pub struct FindMany<T: Table> {
    pub filter: T::Filter,
    /// Applied in order; earlier clauses take precedence.
    pub order_by: Vec<OrderBy<T::Field>>,
}

impl<T: Table> Default for FindMany<T> {
    fn default() -> Self {
        Self {
            filter: Default::default(),
            order_by: Vec::new(),
        }
    }
}

impl<T: Table> FindMany<T> {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: T::Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn asc(mut self, field: T::Field) -> Self {
        self.order_by.push(OrderBy {
            field,
            direction: Direction::Asc,
        });
        self
    }

    pub fn desc(mut self, field: T::Field) -> Self {
        self.order_by.push(OrderBy {
            field,
            direction: Direction::Desc,
        });
        self
    }
}

/// Read/create/delete surface over one table.
pub trait TableClient<T: Table>: Send + Sync {
    fn create(&self, row: T::Row) -> BoxFuture<'static, StoreResult<T::Row>>;
    fn find_unique(&self, key: T::Key) -> BoxFuture<'static, StoreResult<Option<T::Row>>>;
    fn find_first(&self) -> BoxFuture<'static, StoreResult<Option<T::Row>>>;
    fn find_many(&self, query: FindMany<T>) -> BoxFuture<'static, StoreResult<Vec<T::Row>>>;
    fn delete(&self, key: T::Key) -> BoxFuture<'static, StoreResult<()>>;
}

/// Update/upsert surface over one mutable table.
pub trait MutableTableClient<T: MutableTable>: TableClient<T> {
    /// Inserts `create` when `key` is absent, otherwise applies `update`.
    fn upsert(
        &self,
        key: T::Key,
        update: T::Update,
        create: T::Row,
    ) -> BoxFuture<'static, StoreResult<T::Row>>;
    fn update(&self, key: T::Key, update: T::Update) -> BoxFuture<'static, StoreResult<T::Row>>;
}
