//! Task handlers: claim, enqueue, complete, counts and inspection.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use dispatcher::{Task, TaskQuery, TaskState, TaskStore};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

/// Default page size for `GET /tasks`.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Body of `POST /add`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnqueueRequest {
    #[serde(default, alias = "ID")]
    pub id: String,
    /// Lower is more urgent. Drawn at random when absent.
    #[serde(default, alias = "Score")]
    pub score: Option<i64>,
}

/// Body or query string of `POST /finished`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteRequest {
    #[serde(default, alias = "ID")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub state: Option<String>,
    pub limit: Option<usize>,
}

/// Claim the most urgent pending task. Empty body when nothing is pending.
pub async fn claim<S: TaskStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<String, ApiError> {
    let claimed = state.dispatcher.claim().await?;
    Ok(claimed.map(|task| task.id.to_string()).unwrap_or_default())
}

/// Enqueue a task from a JSON `{id, score}` body.
pub async fn enqueue<S: TaskStore + 'static>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<String, ApiError> {
    let request: EnqueueRequest = parse_json(&body)?;
    let priority = state.priority_source.resolve(request.score);

    let task = state.dispatcher.enqueue(&request.id, priority).await?;
    Ok(task.id.to_string())
}

/// Complete a task named by a JSON `{id}` body or an `?id=` query parameter.
pub async fn complete<S: TaskStore + 'static>(
    State(state): State<AppState<S>>,
    params: Result<Query<CompleteRequest>, QueryRejection>,
    body: Bytes,
) -> Result<String, ApiError> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        parse_json::<CompleteRequest>(&body)?.id
    };
    let id = match from_body {
        Some(id) => id,
        None => {
            let Query(params) = params.map_err(|e| ApiError::Params(e.body_text()))?;
            params.id.unwrap_or_default()
        }
    };

    let task = state.dispatcher.complete(&id).await?;
    Ok(task.id.to_string())
}

/// Human-readable per-state counts.
pub async fn counts<S: TaskStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<String, ApiError> {
    let counts = state.dispatcher.count_by_state().await?;
    Ok(counts.to_string())
}

/// List tasks in claim order, optionally filtered by state.
pub async fn list<S: TaskStore + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let filter = params
        .state
        .as_deref()
        .map(str::parse::<TaskState>)
        .transpose()
        .map_err(|e| ApiError::Query(e.to_string()))?;

    let query = TaskQuery {
        state: filter,
        limit: Some(params.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
    };
    Ok(Json(state.dispatcher.list(query).await?))
}

/// Fetch a single task.
pub async fn show<S: TaskStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.dispatcher.get(&id).await?))
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Body(e.to_string()))
}
