//! Database connection management and configuration.

use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect as connect_any};
use surrealdb::opt::auth::Root;
use thiserror::Error;

/// Database connection handle. Cheap to clone; clones share the connection.
pub type Database = Surreal<Any>;

/// Environment variable naming the store namespace. Required.
pub const NAMESPACE_VAR: &str = "DISPATCH_NAMESPACE";

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection endpoint: "mem://", "rocksdb://path", "ws://host:port", ...
    pub endpoint: String,
    /// Namespace to use
    pub namespace: String,
    /// Database name to use
    pub database: String,
    /// Optional root credentials for authentication
    pub credentials: Option<(String, String)>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: "mem://".to_string(),
            namespace: "dispatch".to_string(),
            database: "main".to_string(),
            credentials: None,
        }
    }
}

impl DbConfig {
    /// Create a config for in-memory testing.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Create a config for RocksDB persistence (requires rocksdb feature).
    pub fn rocksdb(path: impl Into<String>) -> Self {
        Self {
            endpoint: format!("rocksdb://{}", path.into()),
            ..Default::default()
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set root credentials for authentication.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Build a config from environment variables.
    ///
    /// - `DISPATCH_NAMESPACE` (required): namespace holding the task table
    /// - `DISPATCH_DB_ENDPOINT` (default: `mem://`)
    /// - `DISPATCH_DB_DATABASE` (default: `main`)
    /// - `DISPATCH_DB_USER`, `DISPATCH_DB_PASS` (optional, both or neither)
    pub fn from_env() -> Result<Self, DbError> {
        let namespace = env_var(NAMESPACE_VAR).ok_or_else(|| {
            DbError::Config(format!("{NAMESPACE_VAR} must be set to the store namespace"))
        })?;

        let mut cfg = Self::default().with_namespace(namespace);
        if let Some(endpoint) = env_var("DISPATCH_DB_ENDPOINT") {
            cfg.endpoint = endpoint;
        }
        if let Some(database) = env_var("DISPATCH_DB_DATABASE") {
            cfg = cfg.with_database(database);
        }

        match (env_var("DISPATCH_DB_USER"), env_var("DISPATCH_DB_PASS")) {
            (Some(user), Some(pass)) => cfg = cfg.with_credentials(user, pass),
            (None, None) => {}
            _ => {
                return Err(DbError::Config(
                    "DISPATCH_DB_USER and DISPATCH_DB_PASS must be set together".into(),
                ));
            }
        }

        Ok(cfg)
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid database config: {0}")]
    Config(String),
    #[error("Connection error: {0}")]
    Connection(#[from] surrealdb::Error),
    #[error("Query error: {0}")]
    Query(String),
}

/// Open a connection and select the configured namespace and database.
pub async fn connect(config: &DbConfig) -> Result<Database, DbError> {
    tracing::info!("Connecting to database: {}", config.endpoint);

    let db = connect_any(config.endpoint.as_str()).await?;

    if let Some((username, password)) = &config.credentials {
        db.signin(Root {
            username,
            password,
        })
        .await?;
    }

    db.use_ns(&config.namespace).use_db(&config.database).await?;

    tracing::info!(
        "Connected to database: {}/{}",
        config.namespace,
        config.database
    );

    Ok(db)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(non_empty)
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let cfg = DbConfig::rocksdb("/var/lib/dispatch")
            .with_namespace("jobs")
            .with_database("prod")
            .with_credentials("root", "secret");

        assert_eq!(cfg.endpoint, "rocksdb:///var/lib/dispatch");
        assert_eq!(cfg.namespace, "jobs");
        assert_eq!(cfg.database, "prod");
        assert_eq!(
            cfg.credentials,
            Some(("root".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        assert_eq!(non_empty("   ".to_string()), None);
        assert_eq!(non_empty(" ns ".to_string()), Some("ns".to_string()));
    }
}
