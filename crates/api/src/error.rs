use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use services::{ErrorKind, GoalServiceError, ProgressServiceError};

/// A failed request, rendered as `{ "error": "..." }`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub(crate) fn goal_not_found() -> Self {
        Self::NotFound("Goal not found".to_string())
    }

    fn from_kind(kind: ErrorKind, err: &dyn std::error::Error) -> Self {
        match kind {
            ErrorKind::NotFound => Self::NotFound(err.to_string()),
            ErrorKind::InvalidInput => Self::BadRequest(err.to_string()),
            ErrorKind::StoreFailure => Self::Internal(err.to_string()),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GoalServiceError> for ApiError {
    fn from(err: GoalServiceError) -> Self {
        Self::from_kind(err.kind(), &err)
    }
}

impl From<ProgressServiceError> for ApiError {
    fn from(err: ProgressServiceError) -> Self {
        Self::from_kind(err.kind(), &err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::NotFound(message) | Self::BadRequest(message) => message,
            Self::Internal(cause) => {
                tracing::error!(error = %cause, "request failed in the store");
                "Internal server error".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
