#![allow(dead_code)]

use std::time::Duration;

use api::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use db::{DbConfig, TaskRepository};
use dispatcher::{
    Dispatcher, DispatcherConfig, PrioritySource, StoreError, Task, TaskId, TaskQuery, TaskState,
    TaskStore,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Router over a fresh in-memory database.
pub async fn app() -> Result<Router, db::DbError> {
    app_with(DispatcherConfig::default(), PrioritySource::Caller).await
}

pub async fn app_with(
    config: DispatcherConfig,
    priority_source: PrioritySource,
) -> Result<Router, db::DbError> {
    let db = db::init(&DbConfig::memory()).await?;
    let dispatcher = Dispatcher::with_config(TaskRepository::new(db), config);
    let state = AppState::new(dispatcher, priority_source);
    Ok(api::router(state, Duration::from_secs(5)))
}

/// Repository whose counts take `delay` to answer.
pub struct SlowCounts {
    inner: TaskRepository,
    delay: Duration,
}

impl TaskStore for SlowCounts {
    async fn insert(&self, task: &Task) -> Result<(), StoreError> {
        self.inner.insert(task).await
    }

    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        self.inner.put(task).await
    }

    async fn get(&self, id: &TaskId) -> Result<Task, StoreError> {
        self.inner.get(id).await
    }

    async fn query(&self, query: &TaskQuery) -> Result<Vec<Task>, StoreError> {
        self.inner.query(query).await
    }

    async fn count(&self, state: TaskState) -> Result<u64, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.count(state).await
    }
}

/// Router with a short request timeout over a store with slow counts.
pub async fn slow_app(
    request_timeout: Duration,
    count_delay: Duration,
) -> Result<Router, db::DbError> {
    let db = db::init(&DbConfig::memory()).await?;
    let store = SlowCounts {
        inner: TaskRepository::new(db),
        delay: count_delay,
    };
    let state = AppState::new(Dispatcher::new(store), PrioritySource::Caller);
    Ok(api::router(state, request_timeout))
}

pub async fn send(
    app: &Router,
    request: Request<Body>,
) -> Result<(StatusCode, String), Box<dyn std::error::Error>> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok((status, String::from_utf8(bytes.to_vec())?))
}

pub async fn get(
    app: &Router,
    uri: &str,
) -> Result<(StatusCode, String), Box<dyn std::error::Error>> {
    send(app, Request::get(uri).body(Body::empty())?).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    body: &str,
) -> Result<(StatusCode, String), Box<dyn std::error::Error>> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?;
    send(app, request).await
}
