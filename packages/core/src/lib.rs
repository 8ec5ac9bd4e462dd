//! Core domain types for the task dispatcher.
//!
//! This crate contains shared types used across all packages:
//! - Task, TaskId and TaskState for work items
//! - Priority and PrioritySource for claim ordering
//! - TaskCounts for per-state aggregates
//! - The TaskStore port and its error taxonomy

mod counts;
pub mod error;
mod priority;
mod store;
mod task;

pub use counts::TaskCounts;
pub use error::{
    ClaimError, CompleteError, EnqueueError, InvalidTaskId, InvalidTransition, LookupError,
    StoreError,
};
pub use priority::{Priority, PrioritySource, RANDOM_PRIORITY_MAX};
pub use store::{TaskQuery, TaskStore};
pub use task::{Task, TaskId, TaskState, UnknownState};
