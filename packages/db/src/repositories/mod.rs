//! Repository implementations for database operations.

mod task_repo;

pub use task_repo::TaskRepository;
