//! SurrealDB integration for the task dispatcher.
//!
//! This crate provides database connectivity and the repository that
//! implements the `TaskStore` port.
//!
//! # Features
//!
//! - `memory` (default): Use in-memory storage for testing
//! - `rocksdb`: Use RocksDB for persistent file-based storage
//! - `remote`: Connect to a SurrealDB server over ws/http

mod connection;
mod schema;
pub mod repositories;

pub use connection::{Database, DbConfig, DbError, NAMESPACE_VAR, connect};
pub use repositories::TaskRepository;
pub use schema::{TASK_TABLE, init_schema};

/// Connect with the given configuration and initialize the schema.
///
/// This should be called once at application startup.
pub async fn init(config: &DbConfig) -> Result<Database, DbError> {
    let db = connect(config).await?;
    init_schema(&db).await?;
    Ok(db)
}
