//! JSON error responses for the HTTP API.

use axum::{
    http::{header::RETRY_AFTER, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::common::ErrorKind;
use crate::domains::auth::AuthError;
use crate::domains::posts::{PostError, ScheduleError};
use crate::domains::publishing::PublishError;
use crate::domains::topics::TopicError;

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub retry_after: Option<DateTime<Utc>>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated, "Sign in to continue")
    }

    /// Internal errors are logged in full and reported generically.
    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = ?err, "Internal error");
        Self::new(ErrorKind::Internal, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        let mut error = json!({
            "kind": self.kind,
            "message": self.message,
        });
        if let Some(steps) = self.kind.remediation() {
            error["remediation"] = json!(steps);
        }
        if let Some(retry_after) = self.retry_after {
            error["retry_after"] = json!(retry_after);
        }

        let mut response = (status, Json(json!({ "error": error }))).into_response();
        if let Some(retry_after) = self.retry_after {
            let secs = (retry_after - Utc::now()).num_seconds().max(0);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal(err)
    }
}

impl From<PublishError> for ApiError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::Storage(e) => ApiError::internal(e),
            other => ApiError::new(other.kind(), other.to_string()),
        }
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Publish(e) => e.into(),
            other => ApiError::new(other.kind(), other.to_string()),
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::Publish(e) => e.into(),
            PostError::Schedule(e) => e.into(),
            PostError::Storage(e) => ApiError::internal(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(e) => ApiError::internal(e),
            AuthError::AccountLocked { retry_after } => ApiError {
                retry_after: Some(retry_after),
                ..ApiError::new(ErrorKind::AccountLocked, err.to_string())
            },
            other => ApiError::new(other.kind(), other.to_string()),
        }
    }
}

impl From<TopicError> for ApiError {
    fn from(err: TopicError) -> Self {
        match err {
            TopicError::Storage(e) => ApiError::internal(e),
            TopicError::Scraper(e) => {
                tracing::warn!(error = %e, "Apify request failed");
                ApiError::new(ErrorKind::Upstream, format!("Topic search failed: {}", e))
            }
            other => ApiError::new(other.kind(), other.to_string()),
        }
    }
}
