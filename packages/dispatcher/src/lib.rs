//! Claim-and-state-transition engine for the task dispatcher.
//!
//! # Architecture
//!
//! - `Dispatcher` - Enqueues, claims, completes and counts tasks
//! - `ClaimSerializer` - Keeps claim sequences one-at-a-time per process
//!
//! # Usage
//!
//! ```ignore
//! use dispatcher::Dispatcher;
//!
//! let dispatcher = Dispatcher::new(store);
//! dispatcher.enqueue("resize-42", Priority::new(10)).await?;
//! let next = dispatcher.claim().await?;
//! ```

mod config;
mod lifecycle;
mod serializer;

pub use config::DispatcherConfig;
pub use lifecycle::Dispatcher;
pub use serializer::{ClaimPermit, ClaimSerializer};

/// Re-export core types for convenience.
pub use dispatch_core::{
    ClaimError, CompleteError, EnqueueError, LookupError, Priority, PrioritySource, StoreError,
    Task, TaskCounts, TaskId, TaskQuery, TaskState, TaskStore,
};
