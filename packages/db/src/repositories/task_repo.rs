//! Task repository: the SurrealDB-backed task store.

use chrono::{DateTime, Utc};
use dispatch_core::{StoreError, Task, TaskId, TaskQuery, TaskState, TaskStore};
use serde::{Deserialize, Serialize};

use crate::Database;
use crate::schema::TASK_TABLE;

/// Repository for task persistence operations.
#[derive(Clone)]
pub struct TaskRepository {
    db: Database,
}

/// Internal record type for SurrealDB.
///
/// Timestamps are stored as unix microseconds so ordering is numeric.
#[derive(Debug, Serialize, Deserialize)]
struct TaskRecord {
    task_id: String,
    state: String,
    priority: i64,
    enqueued_at: i64,
    updated_at: i64,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id.to_string(),
            state: task.state.as_str().to_string(),
            priority: task.priority.value(),
            enqueued_at: task.enqueued_at.timestamp_micros(),
            updated_at: task.updated_at.timestamp_micros(),
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = StoreError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| {
            StoreError::Backend(format!("corrupt task record {}: {what}", record.task_id))
        };
        let id = TaskId::parse(record.task_id.clone()).map_err(|_| corrupt("empty id"))?;
        let state: TaskState = record.state.parse().map_err(|_| corrupt("bad state"))?;
        let enqueued_at = micros_to_datetime(record.enqueued_at)
            .ok_or_else(|| corrupt("bad enqueued_at"))?;
        let updated_at =
            micros_to_datetime(record.updated_at).ok_or_else(|| corrupt("bad updated_at"))?;

        Ok(Task {
            id,
            state,
            priority: record.priority.into(),
            enqueued_at,
            updated_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: i64,
}

impl TaskRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying connection.
    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn select(&self, id: &TaskId) -> Result<Option<TaskRecord>, StoreError> {
        self.db
            .select((TASK_TABLE, id.to_string()))
            .await
            .map_err(StoreError::backend)
    }
}

impl TaskStore for TaskRepository {
    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        let created: Result<Option<TaskRecord>, surrealdb::Error> = self
            .db
            .create((TASK_TABLE, task.id.to_string()))
            .content(TaskRecord::from(task))
            .await;

        match created {
            Ok(_) => Ok(()),
            Err(err) => {
                // CREATE refuses existing keys; tell that apart from a backend fault.
                if self.select(&task.id).await?.is_some() {
                    Err(StoreError::AlreadyExists(task.id.clone()))
                } else {
                    Err(StoreError::backend(err))
                }
            }
        }
    }

    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        let _: Option<TaskRecord> = self
            .db
            .upsert((TASK_TABLE, task.id.to_string()))
            .content(TaskRecord::from(task))
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> Result<Task, StoreError> {
        self.select(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.clone()))?
            .try_into()
    }

    async fn query(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let mut sql = format!("SELECT * FROM {TASK_TABLE}");
        if query.state.is_some() {
            sql.push_str(" WHERE state = $state");
        }
        sql.push_str(" ORDER BY priority ASC, enqueued_at ASC, task_id ASC");
        if query.limit.is_some() {
            sql.push_str(" LIMIT $limit");
        }

        let mut request = self.db.query(sql);
        if let Some(state) = query.state {
            request = request.bind(("state", state.as_str()));
        }
        if let Some(limit) = query.limit {
            request = request.bind(("limit", i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut response = request.await.map_err(StoreError::backend)?;
        let records: Vec<TaskRecord> = response.take(0).map_err(StoreError::backend)?;

        records.into_iter().map(Task::try_from).collect()
    }

    async fn count(&self, state: TaskState) -> Result<u64, StoreError> {
        let mut response = self
            .db
            .query(format!(
                "SELECT count() AS count FROM {TASK_TABLE} WHERE state = $state GROUP ALL"
            ))
            .bind(("state", state.as_str()))
            .await
            .map_err(StoreError::backend)?;

        let rows: Vec<CountRow> = response.take(0).map_err(StoreError::backend)?;

        Ok(rows.first().map(|row| row.count.max(0) as u64).unwrap_or(0))
    }
}

fn micros_to_datetime(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
}
