//! Liveness and readiness checks.

/// Always answers `ok` while the process is serving.
pub async fn ok() -> &'static str {
    "ok"
}
