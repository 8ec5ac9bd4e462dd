//! Mapping of dispatcher errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dispatcher::{ClaimError, CompleteError, EnqueueError, LookupError, StoreError};
use thiserror::Error;

/// Every failure a handler can report.
///
/// The dispatcher routes (`/get`, `/add`, `/finished`, `/state` and their
/// aliases) answer every failure with a 500 and a description.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Body(String),
    /// Unreadable query string on a dispatcher route.
    #[error("invalid query parameters: {0}")]
    Params(String),
    /// Bad filter on an inspection route.
    #[error("invalid query: {0}")]
    Query(String),
    #[error(transparent)]
    Enqueue(#[from] EnqueueError),
    #[error(transparent)]
    Claim(#[from] ClaimError),
    #[error(transparent)]
    Complete(#[from] CompleteError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Query(_) | ApiError::Lookup(LookupError::InvalidInput(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Lookup(LookupError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure came from the store rather than the request.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            ApiError::Store(_)
                | ApiError::Claim(_)
                | ApiError::Enqueue(EnqueueError::Backend(_))
                | ApiError::Complete(CompleteError::Backend(_) | CompleteError::Transition(_))
                | ApiError::Lookup(LookupError::Backend(_))
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_backend() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::warn!("request rejected: {self}");
        }

        (self.status(), format!("An error occurred: {self}")).into_response()
    }
}
