//! Application errors and their mapping onto route outcomes.
//!
//! Client-caused errors become intentional [`HttpSignal`]s with a status and
//! a plain-text message. Everything else is forwarded to the error pipeline
//! as an unexpected failure.

use axum::http::StatusCode;
use typed_router::{HttpSignal, RouteError};

/// Errors raised by the user store and handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// Entity not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Invalid request data (400).
    #[error("{0}")]
    Validation(String),

    /// Resource conflict (409).
    #[error("{0}")]
    Conflict(String),

    /// Server-side failure; never shown to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status for client-caused errors, `None` for internal ones.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            AppError::Validation(_) => Some(StatusCode::BAD_REQUEST),
            AppError::Conflict(_) => Some(StatusCode::CONFLICT),
            AppError::Internal(_) => None,
        }
    }
}

impl From<AppError> for RouteError {
    fn from(err: AppError) -> Self {
        match err.status() {
            Some(status) => RouteError::Signal(HttpSignal::new(status, err.to_string())),
            None => RouteError::unexpected(err),
        }
    }
}
