//! Named tables and their store-level row shapes.
//!
//! Rows mirror what the engine stores: signed integers, raw id strings and
//! UTC timestamps. Nothing here is validated.

use super::{MutableTable, Table};
use chrono::{DateTime, Utc};

/// `cells` table marker.
pub struct Cells;
/// `games` table marker.
pub struct Games;
/// `users` table marker.
pub struct Users;
/// `tasks` table marker.
pub struct Tasks;

/// Stored cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRow {
    pub x: i64,
    pub y: i64,
    pub is_bomb: bool,
    pub cell_value: i64,
    pub who_opened: Option<Vec<String>>,
    pub when_opened: DateTime<Utc>,
    pub is_user_input: bool,
}

/// Position key of the `cells` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellKey {
    pub x: i64,
    pub y: i64,
}

/// `where` clause for cells. Unset fields do not constrain the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellFilter {
    /// Exact equality against the stored opener list.
    pub who_opened: Option<Vec<String>>,
    pub is_user_input: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField {
    X,
    Y,
    WhenOpened,
}

impl Table for Cells {
    const NAME: &'static str = "cells";
    type Row = CellRow;
    type Key = CellKey;
    type Filter = CellFilter;
    type Field = CellField;
}

/// Stored game board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub id: String,
    pub bomb_map: Vec<Vec<i64>>,
    pub user_inputs: Vec<Vec<i64>>,
}

/// Update payload for games. There is no bomb-map field: the layout is
/// write-once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameUpdate {
    pub user_inputs: Vec<Vec<i64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameField {
    Id,
}

impl Table for Games {
    const NAME: &'static str = "games";
    type Row = GameRow;
    type Key = String;
    type Filter = ();
    type Field = GameField;
}

impl MutableTable for Games {
    type Update = GameUpdate;
}

/// Stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    Email,
}

impl Table for Users {
    const NAME: &'static str = "users";
    type Row = UserRow;
    type Key = String;
    type Filter = ();
    type Field = UserField;
}

impl MutableTable for Users {
    type Update = UserUpdate;
}

/// Stored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub label: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskUpdate {
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Id,
    CreatedAt,
}

impl Table for Tasks {
    const NAME: &'static str = "tasks";
    type Row = TaskRow;
    type Key = String;
    type Filter = ();
    type Field = TaskField;
}

impl MutableTable for Tasks {
    type Update = TaskUpdate;
}
