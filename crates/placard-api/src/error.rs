//! Error types for placard-api

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use placard_core::ErrorKind;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving a request
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from the sync service or its ports
    #[error(transparent)]
    Core(#[from] placard_core::Error),

    /// Request body or query string could not be decoded
    #[error("Malformed request: {0}")]
    BadRequest(String),
}

impl Error {
    /// Stable kind reported in error payloads.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Core(e) => e.kind(),
            Self::BadRequest(_) => ErrorKind::InvalidInput,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Core(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Core(e) => match e.kind() {
                ErrorKind::RegisterReadFailed | ErrorKind::RegisterWriteFailed => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    kind: ErrorKind,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }
        let body = ErrorBody {
            status: "Error",
            kind: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
