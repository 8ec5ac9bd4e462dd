//! Database schema definitions using SurrealQL.

use crate::{Database, DbError};

/// Table holding every task ever enqueued.
pub const TASK_TABLE: &str = "task";

/// Initialize the database schema.
///
/// Idempotent; safe to run on every startup.
pub async fn init_schema(db: &Database) -> Result<(), DbError> {
    tracing::info!("Initializing database schema...");

    db.query(TASK_SCHEMA)
        .await?
        .check()
        .map_err(|e| DbError::Query(format!("failed to define task schema: {e}")))?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Task table schema. Record keys are the client-assigned task ids.
const TASK_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS task SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS task_id ON task TYPE string;
DEFINE FIELD IF NOT EXISTS state ON task TYPE string ASSERT $value IN ["pending", "claimed", "done"];
DEFINE FIELD IF NOT EXISTS priority ON task TYPE int;
DEFINE FIELD IF NOT EXISTS enqueued_at ON task TYPE int;
DEFINE FIELD IF NOT EXISTS updated_at ON task TYPE int;

-- Per-state counts
DEFINE INDEX IF NOT EXISTS task_state ON task FIELDS state;

-- Claim selection: pending tasks by priority, then age
DEFINE INDEX IF NOT EXISTS task_pending ON task FIELDS state, priority, enqueued_at;
"#;
