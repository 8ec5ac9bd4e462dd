//! The task store port consumed by the lifecycle engine.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{StoreError, Task, TaskId, TaskState};

/// Filter and limit for [`TaskStore::query`].
///
/// Results are always ordered ascending by priority, then enqueue time,
/// then id, so equal priorities resolve deterministically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    pub state: Option<TaskState>,
    pub limit: Option<usize>,
}

impl TaskQuery {
    /// All tasks, any state.
    pub fn all() -> Self {
        Self::default()
    }

    /// Tasks in one state.
    pub fn in_state(state: TaskState) -> Self {
        Self {
            state: Some(state),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `task` passes the state filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.state.is_none_or(|state| task.state == state)
    }
}

/// Durable keyed record store for tasks.
///
/// The store gives no optimistic-concurrency check on `put`; callers that
/// read-modify-write must serialize themselves.
pub trait TaskStore: Send + Sync {
    /// Create a task. Fails with [`StoreError::AlreadyExists`] if the id is taken.
    fn insert(&self, task: &Task) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Upsert a task by id.
    fn put(&self, task: &Task) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetch a task. Fails with [`StoreError::NotFound`] if absent.
    fn get(&self, id: &TaskId) -> impl Future<Output = Result<Task, StoreError>> + Send;

    /// Filtered, ordered, limited scan. No match yields an empty vector.
    fn query(
        &self,
        query: &TaskQuery,
    ) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// Number of tasks currently in `state`.
    fn count(&self, state: TaskState) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

impl<S: TaskStore> TaskStore for Arc<S> {
    fn insert(&self, task: &Task) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).insert(task)
    }

    fn put(&self, task: &Task) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).put(task)
    }

    fn get(&self, id: &TaskId) -> impl Future<Output = Result<Task, StoreError>> + Send {
        (**self).get(id)
    }

    fn query(
        &self,
        query: &TaskQuery,
    ) -> impl Future<Output = Result<Vec<Task>, StoreError>> + Send {
        (**self).query(query)
    }

    fn count(&self, state: TaskState) -> impl Future<Output = Result<u64, StoreError>> + Send {
        (**self).count(state)
    }
}
