//! Error taxonomy shared by the backend client and the MCP tools.
//!
//! The Search API plugin reports failures as an HTTP status plus a JSON body
//! of the shape `{"error": "<message>", "status": <int>}`. The status code
//! alone decides success or failure; a 2xx body is never inspected for an
//! embedded error field.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Client-facing error kinds, exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidRequest,
    AccessDenied,
    FileTooLarge,
    InvalidPattern,
    Internal,
}

impl ErrorKind {
    /// Wire code reported to the MCP client.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::AccessDenied => "ACCESS_DENIED",
            ErrorKind::FileTooLarge => "FILE_TOO_LARGE",
            ErrorKind::InvalidPattern => "INVALID_PATTERN",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

/// A normalized backend failure: one kind plus a human-readable message.
#[derive(Debug, Clone, Error)]
#[error("{}: {message}", self.kind.code())]
pub struct GitblitError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GitblitError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }
}

/// Map a non-success backend response to a normalized failure.
///
/// Total function: always produces a `GitblitError`, falling back to
/// `Internal` for unexpected statuses and to a generic message when the
/// error body is missing or malformed.
pub fn normalize(status: StatusCode, body: Option<&Value>) -> GitblitError {
    let kind = match status.as_u16() {
        404 => ErrorKind::NotFound,
        400 => ErrorKind::InvalidRequest,
        403 => ErrorKind::AccessDenied,
        413 => ErrorKind::FileTooLarge,
        _ => ErrorKind::Internal,
    };

    let message = body
        .and_then(|body| body.get("error"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown error occurred")
        .to_string();

    GitblitError { kind, message }
}
