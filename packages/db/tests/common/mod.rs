#![allow(dead_code)]

use chrono::{Duration, Utc};
use db::{DbConfig, DbError, TaskRepository};
use dispatch_core::{Priority, Task, TaskId};

/// Fresh in-memory database per call; nothing is shared between tests.
pub async fn setup_repo() -> Result<TaskRepository, DbError> {
    let db = db::init(&DbConfig::memory()).await?;
    Ok(TaskRepository::new(db))
}

/// A pending task enqueued `offset_ms` after a fixed base instant.
pub fn task_at(id: &str, priority: i64, offset_ms: i64) -> Task {
    let mut task = Task::new(TaskId::parse(id).expect("valid id"), Priority::new(priority));
    let at = base_instant() + Duration::milliseconds(offset_ms);
    task.enqueued_at = at;
    task.updated_at = at;
    task
}

fn base_instant() -> chrono::DateTime<Utc> {
    chrono::DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
}
