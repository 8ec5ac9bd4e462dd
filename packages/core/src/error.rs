//! Error taxonomy shared by the store, the lifecycle engine and the API.

use thiserror::Error;

use crate::{TaskId, TaskState};

/// A task ID was missing or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("id is required")]
pub struct InvalidTaskId;

/// A state change the lifecycle forbids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid state transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: TaskState,
    pub to: TaskState,
}

/// Errors reported by a [`TaskStore`](crate::TaskStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("task already exists: {0}")]
    AlreadyExists(TaskId),
    /// Transport or availability failure of the backing store.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum EnqueueError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidTaskId),
    #[error("the task already exists: {0}")]
    AlreadyExists(TaskId),
    #[error(transparent)]
    Backend(StoreError),
}

impl From<StoreError> for EnqueueError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(id) => EnqueueError::AlreadyExists(id),
            other => EnqueueError::Backend(other),
        }
    }
}

/// Claim failures. An empty pool is not one of them.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Backend(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum CompleteError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidTaskId),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Completion of a never-claimed task while that is disallowed.
    #[error("task has not been claimed: {0}")]
    NotClaimed(TaskId),
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Backend(StoreError),
}

impl From<StoreError> for CompleteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CompleteError::NotFound(id),
            other => CompleteError::Backend(other),
        }
    }
}

/// Errors looking up a single task.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidTaskId),
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error(transparent)]
    Backend(StoreError),
}

impl From<StoreError> for LookupError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => LookupError::NotFound(id),
            other => LookupError::Backend(other),
        }
    }
}
