//! SQLite implementation of the query client.
//!
//! # Responsibility
//! - Translate table operations into parameterized SQL.
//! - Run statements off the async runtime on the blocking pool.
//!
//! # Invariants
//! - One connection, serialized behind a mutex; every call is one statement
//!   or one transaction.
//! - Writes commit only after the returned row was read back.
//! - Column names in SQL come only from per-table constants, never from input.
//! - Grids and opener lists are JSON text; timestamps are RFC 3339 text with
//!   millisecond precision. Callers keep years within 0001..=9999, where
//!   lexical order matches time order.

use super::tables::{
    CellField, CellFilter, CellKey, CellRow, Cells, GameField, GameRow, GameUpdate, Games,
    TaskField, TaskRow, TaskUpdate, Tasks, UserField, UserRow, UserUpdate, Users,
};
use super::{
    Direction, FindMany, MutableTableClient, StoreError, StoreResult, Table, TableClient,
};
use crate::db::{open_db, open_db_in_memory, DbResult};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::BoxFuture;
use rusqlite::types::Value;
use rusqlite::{ffi, params_from_iter, Connection, Row};
use schema::{SqliteMutableTable, SqliteTable};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Query client over one migrated SQLite connection.
#[derive(Clone)]
pub struct SqliteClient {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteClient {
    /// Wraps a connection that already has migrations applied.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens (and migrates) a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn run<R, F>(&self, op: F) -> BoxFuture<'static, StoreResult<R>>
    where
        R: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<R> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
                op(&mut guard)
            })
            .await?
        })
    }
}

mod schema {
    use super::super::{MutableTable, StoreResult, Table};
    use rusqlite::types::Value;
    use rusqlite::Row;

    /// SQL description of one table.
    pub trait SqliteTable: Table {
        /// Column list in `row_params` order.
        const COLUMNS: &'static [&'static str];
        /// Predicate matching exactly one row, with `?` placeholders.
        const KEY_CLAUSE: &'static str;

        fn key_params(key: &Self::Key) -> Vec<Value>;
        fn row_params(row: &Self::Row) -> StoreResult<Vec<Value>>;
        fn filter_clauses(filter: &Self::Filter) -> StoreResult<(Vec<&'static str>, Vec<Value>)>;
        fn column(field: Self::Field) -> &'static str;
        fn read_row(row: &Row<'_>) -> StoreResult<Self::Row>;
    }

    pub trait SqliteMutableTable: SqliteTable + MutableTable {
        /// `column = ?` assignments plus their values.
        fn assignments(update: &Self::Update) -> StoreResult<(Vec<&'static str>, Vec<Value>)>;
    }
}

fn column_list<T: SqliteTable>() -> String {
    T::COLUMNS.join(", ")
}

fn select_sql<T: SqliteTable>() -> String {
    format!("SELECT {} FROM {}", column_list::<T>(), T::NAME)
}

fn insert_row<T: SqliteTable>(conn: &Connection, row: &T::Row) -> StoreResult<T::Row> {
    let placeholders = vec!["?"; T::COLUMNS.len()].join(", ");
    let sql = format!(
        "INSERT INTO {table} ({columns}) VALUES ({placeholders}) RETURNING {columns};",
        table = T::NAME,
        columns = column_list::<T>(),
    );
    let params = T::row_params(row)?;
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt
        .query(params_from_iter(params))
        .map_err(|err| classify_write_error(T::NAME, err))?;
    if let Some(stored) = rows
        .next()
        .map_err(|err| classify_write_error(T::NAME, err))?
    {
        return T::read_row(stored);
    }
    Err(StoreError::RecordNotFound { table: T::NAME })
}

fn update_row<T: SqliteMutableTable>(
    conn: &Connection,
    key: &T::Key,
    update: &T::Update,
) -> StoreResult<Option<T::Row>> {
    let (assignments, mut params) = T::assignments(update)?;
    let sql = format!(
        "UPDATE {table} SET {assignments} WHERE {key} RETURNING {columns};",
        table = T::NAME,
        assignments = assignments.join(", "),
        key = T::KEY_CLAUSE,
        columns = column_list::<T>(),
    );
    params.extend(T::key_params(key));
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt
        .query(params_from_iter(params))
        .map_err(|err| classify_write_error(T::NAME, err))?;
    if let Some(stored) = rows
        .next()
        .map_err(|err| classify_write_error(T::NAME, err))?
    {
        return Ok(Some(T::read_row(stored)?));
    }
    Ok(None)
}

fn classify_write_error(table: &'static str, err: rusqlite::Error) -> StoreError {
    let key_conflict = matches!(
        &err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    );
    if key_conflict {
        StoreError::UniqueViolation { table, source: err }
    } else {
        StoreError::Sqlite(err)
    }
}

impl<T: SqliteTable> TableClient<T> for SqliteClient {
    fn create(&self, row: T::Row) -> BoxFuture<'static, StoreResult<T::Row>> {
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let stored = insert_row::<T>(&tx, &row)?;
            tx.commit()?;
            Ok(stored)
        })
    }

    fn find_unique(&self, key: T::Key) -> BoxFuture<'static, StoreResult<Option<T::Row>>> {
        self.run(move |conn| {
            let sql = format!("{} WHERE {} LIMIT 1;", select_sql::<T>(), T::KEY_CLAUSE);
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(T::key_params(&key)))?;
            if let Some(row) = rows.next()? {
                return Ok(Some(T::read_row(row)?));
            }
            Ok(None)
        })
    }

    fn find_first(&self) -> BoxFuture<'static, StoreResult<Option<T::Row>>> {
        self.run(move |conn| {
            let sql = format!("{} LIMIT 1;", select_sql::<T>());
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([])?;
            if let Some(row) = rows.next()? {
                return Ok(Some(T::read_row(row)?));
            }
            Ok(None)
        })
    }

    fn find_many(&self, query: FindMany<T>) -> BoxFuture<'static, StoreResult<Vec<T::Row>>> {
        self.run(move |conn| {
            let mut sql = select_sql::<T>();
            let (clauses, params) = T::filter_clauses(&query.filter)?;
            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            if !query.order_by.is_empty() {
                let ordering = query
                    .order_by
                    .iter()
                    .map(|clause| {
                        let direction = match clause.direction {
                            Direction::Asc => "ASC",
                            Direction::Desc => "DESC",
                        };
                        format!("{} {direction}", T::column(clause.field))
                    })
                    .collect::<Vec<_>>();
                sql.push_str(" ORDER BY ");
                sql.push_str(&ordering.join(", "));
            }
            sql.push(';');

            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(params))?;
            let mut found = Vec::new();
            while let Some(row) = rows.next()? {
                found.push(T::read_row(row)?);
            }
            Ok(found)
        })
    }

    fn delete(&self, key: T::Key) -> BoxFuture<'static, StoreResult<()>> {
        self.run(move |conn| {
            let sql = format!("DELETE FROM {} WHERE {};", T::NAME, T::KEY_CLAUSE);
            let changed = conn.execute(&sql, params_from_iter(T::key_params(&key)))?;
            if changed == 0 {
                return Err(StoreError::RecordNotFound { table: T::NAME });
            }
            Ok(())
        })
    }
}

impl<T: SqliteMutableTable> MutableTableClient<T> for SqliteClient {
    fn upsert(
        &self,
        key: T::Key,
        update: T::Update,
        create: T::Row,
    ) -> BoxFuture<'static, StoreResult<T::Row>> {
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let updated = update_row::<T>(&tx, &key, &update)?;
            let stored = match updated {
                Some(row) => row,
                None => insert_row::<T>(&tx, &create)?,
            };
            tx.commit()?;
            Ok(stored)
        })
    }

    fn update(&self, key: T::Key, update: T::Update) -> BoxFuture<'static, StoreResult<T::Row>> {
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let stored = update_row::<T>(&tx, &key, &update)?
                .ok_or(StoreError::RecordNotFound { table: T::NAME })?;
            tx.commit()?;
            Ok(stored)
        })
    }
}

impl SqliteTable for Cells {
    const COLUMNS: &'static [&'static str] = &[
        "x",
        "y",
        "is_bomb",
        "cell_value",
        "who_opened",
        "when_opened",
        "is_user_input",
    ];
    const KEY_CLAUSE: &'static str = "x = ? AND y = ?";

    fn key_params(key: &CellKey) -> Vec<Value> {
        vec![Value::Integer(key.x), Value::Integer(key.y)]
    }

    fn row_params(row: &CellRow) -> StoreResult<Vec<Value>> {
        let who_opened = match &row.who_opened {
            Some(openers) => Value::Text(encode_json(Self::NAME, "who_opened", openers)?),
            None => Value::Null,
        };
        Ok(vec![
            Value::Integer(row.x),
            Value::Integer(row.y),
            bool_value(row.is_bomb),
            Value::Integer(row.cell_value),
            who_opened,
            timestamp_value(&row.when_opened),
            bool_value(row.is_user_input),
        ])
    }

    fn filter_clauses(filter: &CellFilter) -> StoreResult<(Vec<&'static str>, Vec<Value>)> {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        if let Some(openers) = &filter.who_opened {
            clauses.push("who_opened = ?");
            params.push(Value::Text(encode_json(Self::NAME, "who_opened", openers)?));
        }
        if let Some(is_user_input) = filter.is_user_input {
            clauses.push("is_user_input = ?");
            params.push(bool_value(is_user_input));
        }
        Ok((clauses, params))
    }

    fn column(field: CellField) -> &'static str {
        match field {
            CellField::X => "x",
            CellField::Y => "y",
            CellField::WhenOpened => "when_opened",
        }
    }

    fn read_row(row: &Row<'_>) -> StoreResult<CellRow> {
        let who_opened = match row.get::<_, Option<String>>("who_opened")? {
            Some(text) => Some(decode_json(Self::NAME, "who_opened", &text)?),
            None => None,
        };
        Ok(CellRow {
            x: row.get("x")?,
            y: row.get("y")?,
            is_bomb: row.get("is_bomb")?,
            cell_value: row.get("cell_value")?,
            who_opened,
            when_opened: row.get("when_opened")?,
            is_user_input: row.get("is_user_input")?,
        })
    }
}

impl SqliteTable for Games {
    const COLUMNS: &'static [&'static str] = &["id", "bomb_map", "user_inputs"];
    const KEY_CLAUSE: &'static str = "id = ?";

    fn key_params(key: &String) -> Vec<Value> {
        vec![Value::Text(key.clone())]
    }

    fn row_params(row: &GameRow) -> StoreResult<Vec<Value>> {
        Ok(vec![
            Value::Text(row.id.clone()),
            Value::Text(encode_json(Self::NAME, "bomb_map", &row.bomb_map)?),
            Value::Text(encode_json(Self::NAME, "user_inputs", &row.user_inputs)?),
        ])
    }

    fn filter_clauses(_filter: &()) -> StoreResult<(Vec<&'static str>, Vec<Value>)> {
        Ok((Vec::new(), Vec::new()))
    }

    fn column(field: GameField) -> &'static str {
        match field {
            GameField::Id => "id",
        }
    }

    fn read_row(row: &Row<'_>) -> StoreResult<GameRow> {
        let bomb_map: String = row.get("bomb_map")?;
        let user_inputs: String = row.get("user_inputs")?;
        Ok(GameRow {
            id: row.get("id")?,
            bomb_map: decode_json(Self::NAME, "bomb_map", &bomb_map)?,
            user_inputs: decode_json(Self::NAME, "user_inputs", &user_inputs)?,
        })
    }
}

impl SqliteMutableTable for Games {
    fn assignments(update: &GameUpdate) -> StoreResult<(Vec<&'static str>, Vec<Value>)> {
        Ok((
            vec!["user_inputs = ?"],
            vec![Value::Text(encode_json(
                Self::NAME,
                "user_inputs",
                &update.user_inputs,
            )?)],
        ))
    }
}

impl SqliteTable for Users {
    const COLUMNS: &'static [&'static str] = &["id", "email", "display_name", "photo_url"];
    const KEY_CLAUSE: &'static str = "id = ?";

    fn key_params(key: &String) -> Vec<Value> {
        vec![Value::Text(key.clone())]
    }

    fn row_params(row: &UserRow) -> StoreResult<Vec<Value>> {
        Ok(vec![
            Value::Text(row.id.clone()),
            Value::Text(row.email.clone()),
            optional_text(&row.display_name),
            optional_text(&row.photo_url),
        ])
    }

    fn filter_clauses(_filter: &()) -> StoreResult<(Vec<&'static str>, Vec<Value>)> {
        Ok((Vec::new(), Vec::new()))
    }

    fn column(field: UserField) -> &'static str {
        match field {
            UserField::Id => "id",
            UserField::Email => "email",
        }
    }

    fn read_row(row: &Row<'_>) -> StoreResult<UserRow> {
        Ok(UserRow {
            id: row.get("id")?,
            email: row.get("email")?,
            display_name: row.get("display_name")?,
            photo_url: row.get("photo_url")?,
        })
    }
}

impl SqliteMutableTable for Users {
    fn assignments(update: &UserUpdate) -> StoreResult<(Vec<&'static str>, Vec<Value>)> {
        Ok((
            vec!["email = ?", "display_name = ?", "photo_url = ?"],
            vec![
                Value::Text(update.email.clone()),
                optional_text(&update.display_name),
                optional_text(&update.photo_url),
            ],
        ))
    }
}

impl SqliteTable for Tasks {
    const COLUMNS: &'static [&'static str] = &["id", "label", "done", "created_at"];
    const KEY_CLAUSE: &'static str = "id = ?";

    fn key_params(key: &String) -> Vec<Value> {
        vec![Value::Text(key.clone())]
    }

    fn row_params(row: &TaskRow) -> StoreResult<Vec<Value>> {
        Ok(vec![
            Value::Text(row.id.clone()),
            Value::Text(row.label.clone()),
            bool_value(row.done),
            timestamp_value(&row.created_at),
        ])
    }

    fn filter_clauses(_filter: &()) -> StoreResult<(Vec<&'static str>, Vec<Value>)> {
        Ok((Vec::new(), Vec::new()))
    }

    fn column(field: TaskField) -> &'static str {
        match field {
            TaskField::Id => "id",
            TaskField::CreatedAt => "created_at",
        }
    }

    fn read_row(row: &Row<'_>) -> StoreResult<TaskRow> {
        Ok(TaskRow {
            id: row.get("id")?,
            label: row.get("label")?,
            done: row.get("done")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl SqliteMutableTable for Tasks {
    fn assignments(update: &TaskUpdate) -> StoreResult<(Vec<&'static str>, Vec<Value>)> {
        Ok((vec!["done = ?"], vec![bool_value(update.done)]))
    }
}

fn encode_json<V: serde::Serialize>(
    table: &'static str,
    column: &'static str,
    value: &V,
) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|source| StoreError::Codec {
        table,
        column,
        source,
    })
}

fn decode_json<V: serde::de::DeserializeOwned>(
    table: &'static str,
    column: &'static str,
    text: &str,
) -> StoreResult<V> {
    serde_json::from_str(text).map_err(|source| StoreError::Codec {
        table,
        column,
        source,
    })
}

fn timestamp_value(value: &DateTime<Utc>) -> Value {
    Value::Text(value.to_rfc3339_opts(SecondsFormat::Millis, false))
}

fn optional_text(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::Text)
}

fn bool_value(value: bool) -> Value {
    if value {
        Value::Integer(1)
    } else {
        Value::Integer(0)
    }
}
