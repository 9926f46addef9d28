//! API error handling for consistent JSON error responses.

use crate::error::NotesError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error type that converts to JSON responses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
    upstream: Option<&'static str>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": true,
            "kind": self.kind,
            "message": self.message,
            "upstream": self.upstream,
        }));
        (self.status, body).into_response()
    }
}

impl From<NotesError> for ApiError {
    fn from(err: NotesError) -> Self {
        let status = match &err {
            NotesError::NotFound(_) | NotesError::NoRecordingsAvailable => StatusCode::NOT_FOUND,
            NotesError::NotReady(_) => StatusCode::CONFLICT,
            NotesError::Auth { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            NotesError::Model(_) => StatusCode::BAD_GATEWAY,
            NotesError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            kind: err.kind(),
            message: err.user_message(),
            upstream: err.upstream().map(|u| u.as_str()),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
