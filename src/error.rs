//! Relay failures and their HTTP mapping.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// How much of an unparseable backend body is echoed back to the caller.
pub const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Prompt missing or blank.
    #[error("{0}")]
    InvalidInput(String),

    /// Connection to the backend could not be established.
    #[error("could not connect to backend at {url}; make sure it is running")]
    BackendUnreachable { url: String },

    /// Backend answered with a non-success status or reported an error.
    #[error("{0}")]
    Upstream(String),

    /// Backend answered 2xx but the body was not JSON.
    #[error("invalid JSON from backend: {excerpt}")]
    MalformedResponse { excerpt: String },

    /// Backend JSON lacked the expected field.
    #[error("backend did not return the '{0}' field")]
    MissingField(&'static str),

    /// Any other transport failure.
    #[error("request to backend failed: {0}")]
    RequestFailed(String),

    #[error("file '{0}' was not found")]
    IndexMissing(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::BackendUnreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            RelayError::MalformedResponse { .. }
            | RelayError::MissingField(_)
            | RelayError::RequestFailed(_)
            | RelayError::IndexMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build a `MalformedResponse` from the raw body, keeping only a short prefix.
    pub fn malformed(body: &str) -> Self {
        RelayError::MalformedResponse {
            excerpt: excerpt(body),
        }
    }
}

/// First [`EXCERPT_CHARS`] characters of `body`, suffixed with `...`.
pub fn excerpt(body: &str) -> String {
    let mut out: String = body.chars().take(EXCERPT_CHARS).collect();
    out.push_str("...");
    out
}

impl From<QueryRejection> for RelayError {
    fn from(rejection: QueryRejection) -> Self {
        RelayError::InvalidInput(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
    status: u16,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.to_string(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
