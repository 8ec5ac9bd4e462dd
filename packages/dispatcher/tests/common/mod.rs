#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dispatcher::{StoreError, Task, TaskId, TaskQuery, TaskState, TaskStore};
use tokio::sync::Notify;

/// In-process task store with fault injection for lifecycle tests.
///
/// Every operation yields to the scheduler before touching the map so that
/// concurrent callers interleave between a query and the following put.
#[derive(Default)]
pub struct MemoryStore {
    tasks: Mutex<HashMap<TaskId, Task>>,
    failing_puts: AtomicUsize,
    puts: AtomicUsize,
    query_delay: Mutex<Option<Duration>>,
    query_hold: Mutex<Option<Arc<QueryHold>>>,
}

/// Pauses one query between reading the pool and returning it.
#[derive(Default)]
pub struct QueryHold {
    /// Signalled once the held query has read the pool.
    pub reached: Notify,
    /// Signal to let the held query return.
    pub release: Notify,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` puts fail with a backend error.
    pub fn fail_next_puts(&self, n: usize) {
        self.failing_puts.store(n, Ordering::SeqCst);
    }

    /// Sleep this long inside every query.
    pub fn delay_queries(&self, delay: Duration) {
        *self.query_delay.lock().unwrap() = Some(delay);
    }

    /// Hold the next query after it reads the pool until released.
    pub fn hold_next_query(&self) -> Arc<QueryHold> {
        let hold = Arc::new(QueryHold::default());
        *self.query_hold.lock().unwrap() = Some(hold.clone());
        hold
    }

    pub fn clear_query_delay(&self) {
        *self.query_delay.lock().unwrap() = None;
    }

    /// Number of successful puts so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self, id: &str) -> Option<Task> {
        let id = TaskId::parse(id).ok()?;
        self.tasks.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

impl TaskStore for MemoryStore {
    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        let mut tasks = self.tasks.lock().unwrap();
        if tasks.contains_key(&task.id) {
            return Err(StoreError::AlreadyExists(task.id.clone()));
        }
        tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        let failing = self
            .failing_puts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StoreError::Backend("injected put failure".into()));
        }
        self.tasks
            .lock()
            .unwrap()
            .insert(task.id.clone(), task.clone());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> Result<Task, StoreError> {
        tokio::task::yield_now().await;
        self.tasks
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn query(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        let delay = *self.query_delay.lock().unwrap();
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        let mut matching: Vec<Task> = self
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            (a.priority, a.enqueued_at, &a.id).cmp(&(b.priority, b.enqueued_at, &b.id))
        });
        if let Some(limit) = query.limit {
            matching.truncate(limit);
        }

        let hold = self.query_hold.lock().unwrap().take();
        if let Some(hold) = hold {
            hold.reached.notify_one();
            hold.release.notified().await;
        }

        // Let another caller run between this read and the caller's write.
        tokio::task::yield_now().await;
        Ok(matching)
    }

    async fn count(&self, state: TaskState) -> Result<u64, StoreError> {
        tokio::task::yield_now().await;
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|task| task.state == state)
            .count() as u64)
    }
}
