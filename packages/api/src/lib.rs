//! HTTP surface for the task dispatcher.
//!
//! This crate contains the axum router and handlers for:
//! - Claiming, enqueuing and completing tasks
//! - Per-state counts and task inspection
//! - Liveness and readiness checks

mod config;
mod error;
mod health;
mod tasks;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use dispatcher::{Dispatcher, PrioritySource, TaskStore};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use tasks::{CompleteRequest, DEFAULT_LIST_LIMIT, EnqueueRequest, ListParams};

/// Shared handler state.
pub struct AppState<S> {
    pub dispatcher: Arc<Dispatcher<S>>,
    /// Where new tasks get their priority from.
    pub priority_source: PrioritySource,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            priority_source: self.priority_source,
        }
    }
}

impl<S: TaskStore> AppState<S> {
    pub fn new(dispatcher: Dispatcher<S>, priority_source: PrioritySource) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            priority_source,
        }
    }
}

/// Build the dispatcher router.
///
/// `/get`, `/add` and `/finished` are kept alongside `/claim`, `/enqueue`
/// and `/complete` for existing workers.
pub fn router<S: TaskStore + 'static>(state: AppState<S>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/get", get(tasks::claim::<S>))
        .route("/claim", get(tasks::claim::<S>))
        .route("/add", post(tasks::enqueue::<S>))
        .route("/enqueue", post(tasks::enqueue::<S>))
        .route("/finished", post(tasks::complete::<S>))
        .route("/complete", post(tasks::complete::<S>))
        .route("/state", get(tasks::counts::<S>))
        .route("/tasks", get(tasks::list::<S>))
        .route("/tasks/{id}", get(tasks::show::<S>))
        .route("/liveness_check", get(health::ok))
        .route("/readiness_check", get(health::ok))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
