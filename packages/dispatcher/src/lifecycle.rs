//! Task lifecycle engine: enqueue, claim, complete and count.

use dispatch_core::{
    ClaimError, CompleteError, EnqueueError, LookupError, Priority, StoreError, Task, TaskCounts,
    TaskId, TaskQuery, TaskState, TaskStore,
};

use crate::config::DispatcherConfig;
use crate::serializer::ClaimSerializer;

/// Drives tasks through `Pending -> Claimed -> Done` against a [`TaskStore`].
///
/// [`claim`](Self::claim) always takes the claim gate. [`complete`](Self::complete)
/// takes it only for a task that is still pending.
#[derive(Debug)]
pub struct Dispatcher<S> {
    store: S,
    claims: ClaimSerializer,
    config: DispatcherConfig,
}

impl<S: TaskStore> Dispatcher<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, DispatcherConfig::default())
    }

    pub fn with_config(store: S, config: DispatcherConfig) -> Self {
        Self {
            store,
            claims: ClaimSerializer::new(),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The gate serializing claims in this process.
    pub fn claims(&self) -> &ClaimSerializer {
        &self.claims
    }

    /// Add a new pending task.
    ///
    /// Fails with `AlreadyExists` if the id was ever used; the existing task
    /// is left untouched.
    pub async fn enqueue(&self, id: &str, priority: Priority) -> Result<Task, EnqueueError> {
        let id = TaskId::parse(id)?;
        let task = Task::new(id, priority);

        self.store
            .insert(&task)
            .await
            .inspect_err(|e| tracing::warn!(task_id = %task.id, "enqueue rejected: {e}"))?;

        tracing::info!(task_id = %task.id, priority = %task.priority, "task enqueued");
        Ok(task)
    }

    /// Claim the most urgent pending task, or `None` when the pool is empty.
    ///
    /// The task is only returned once the store has confirmed the write.
    pub async fn claim(&self) -> Result<Option<Task>, ClaimError> {
        let _permit = self.claims.acquire().await;

        let query = TaskQuery::in_state(TaskState::Pending).with_limit(1);
        let Some(mut task) = self.store.query(&query).await?.into_iter().next() else {
            tracing::debug!("pending pool is empty");
            return Ok(None);
        };

        task.transition(TaskState::Claimed)?;
        self.store
            .put(&task)
            .await
            .inspect_err(|e| tracing::error!(task_id = %task.id, "failed to persist claim: {e}"))?;

        tracing::info!(task_id = %task.id, priority = %task.priority, "task claimed");
        Ok(Some(task))
    }

    /// Mark a task done.
    ///
    /// Completing a task that is already done returns it unchanged.
    pub async fn complete(&self, id: &str) -> Result<Task, CompleteError> {
        let id = TaskId::parse(id)?;
        let mut task = self.store.get(&id).await?;

        // A pending task may be mid-claim. Hold the gate and re-read so the
        // claim's write cannot land on top of Done.
        let racing_claim =
            task.state == TaskState::Pending && self.config.allow_complete_unclaimed;
        let _permit = if racing_claim {
            let permit = self.claims.acquire().await;
            task = self.store.get(&id).await?;
            Some(permit)
        } else {
            None
        };

        match task.state {
            TaskState::Done => {
                tracing::debug!(task_id = %id, "task already done");
                return Ok(task);
            }
            TaskState::Pending if !self.config.allow_complete_unclaimed => {
                return Err(CompleteError::NotClaimed(id));
            }
            TaskState::Pending => {
                tracing::warn!(task_id = %id, "completing a task that was never claimed");
            }
            TaskState::Claimed => {}
        }

        task.transition(TaskState::Done)?;
        self.store.put(&task).await?;

        tracing::info!(task_id = %task.id, "task completed");
        Ok(task)
    }

    /// Number of tasks in each state.
    ///
    /// The three counts run concurrently and may be skewed slightly.
    pub async fn count_by_state(&self) -> Result<TaskCounts, StoreError> {
        let (pending, claimed, done) = tokio::try_join!(
            self.store.count(TaskState::Pending),
            self.store.count(TaskState::Claimed),
            self.store.count(TaskState::Done),
        )?;

        Ok(TaskCounts {
            pending,
            claimed,
            done,
        })
    }

    /// Look up a single task.
    pub async fn get(&self, id: &str) -> Result<Task, LookupError> {
        let id = TaskId::parse(id)?;
        Ok(self.store.get(&id).await?)
    }

    /// List tasks in claim order.
    pub async fn list(&self, query: TaskQuery) -> Result<Vec<Task>, StoreError> {
        self.store.query(&query).await
    }
}
