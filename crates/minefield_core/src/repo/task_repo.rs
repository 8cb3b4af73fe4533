//! Task repository and row mapper.
//!
//! Same policies as cells: `create` propagates, everything else degrades.

use super::degrade::or_sentinel;
use super::{map_rows, RepoError, RepoResult};
use crate::client::{FindMany, MutableTableClient, Table, TaskField, TaskRow, TaskUpdate, Tasks};
use crate::model::ids::TaskId;
use crate::model::task::{validate_label, Task};
use crate::model::validation::ValidationError;
use chrono::Utc;

/// Persistence facade for the `tasks` table.
#[derive(Clone)]
pub struct TaskRepository<C> {
    client: C,
}

impl<C: MutableTableClient<Tasks>> TaskRepository<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Creates an open task stamped with the current time.
    ///
    /// # Errors
    /// - `RepoError::InvalidInput` when `label` is blank.
    /// - `RepoError::Store` when the insert fails.
    pub async fn create(&self, label: &str) -> RepoResult<Task> {
        validate_label(label).map_err(RepoError::invalid_input("task"))?;
        let row = TaskRow {
            id: TaskId::generate().to_string(),
            label: label.to_string(),
            done: false,
            created_at: Utc::now(),
        };
        let stored = self.client.create(row).await?;
        Task::try_from(stored).map_err(RepoError::invalid_row(Tasks::NAME))
    }

    /// All tasks, newest first.
    pub async fn find_all(&self) -> Vec<Task> {
        or_sentinel("task_find_all", self.try_find_all().await)
    }

    pub async fn try_find_all(&self) -> RepoResult<Vec<Task>> {
        let query = FindMany::<Tasks>::all()
            .desc(TaskField::CreatedAt)
            .asc(TaskField::Id);
        let rows = self.client.find_many(query).await?;
        map_rows(Tasks::NAME, rows, Task::try_from)
    }

    /// Sets the completion flag; `None` when the task is missing or on failure.
    pub async fn set_done(&self, id: &TaskId, done: bool) -> Option<Task> {
        or_sentinel("task_set_done", self.try_set_done(id, done).await.map(Some))
    }

    pub async fn try_set_done(&self, id: &TaskId, done: bool) -> RepoResult<Task> {
        let stored = self
            .client
            .update(id.to_string(), TaskUpdate { done })
            .await?;
        Task::try_from(stored).map_err(RepoError::invalid_row(Tasks::NAME))
    }

    pub async fn delete(&self, id: &TaskId) {
        or_sentinel("task_delete", self.try_delete(id).await)
    }

    pub async fn try_delete(&self, id: &TaskId) -> RepoResult<()> {
        self.client.delete(id.to_string()).await?;
        Ok(())
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = ValidationError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        validate_label(&row.label)?;
        Ok(Self {
            id: TaskId::parse(row.id)?,
            label: row.label,
            done: row.done,
            created: row.created_at.timestamp_millis(),
        })
    }
}
