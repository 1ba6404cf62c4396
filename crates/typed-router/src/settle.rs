//! Turning a handler's outcome into exactly one terminal action.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::pipeline::forward;
use crate::response::ResponseWriter;
use crate::signal::{Payload, RouteError};

/// The terminal action taken for one request.
///
/// Attached to every adapted response as an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The handler's value was serialized and sent.
    Sent,
    /// An intentional signal was answered with this status.
    ErrorResponse(StatusCode),
    /// An unexpected failure went to the error pipeline.
    Forwarded,
    /// The handler committed the response itself through its writer.
    HandlerManaged,
}

/// Settles a handler result against its writer.
///
/// If the writer has already been used, its response is returned as-is and
/// the result is discarded; otherwise the writer is claimed so later sends
/// are inert, and the result decides the response.
pub fn settle<T: Serialize>(result: Result<T, RouteError>, writer: &ResponseWriter) -> Response {
    if !writer.claim() {
        if let Err(err) = &result {
            tracing::warn!(error = %err, "handler failed after sending its own response");
        }
        let mut response = writer.take().unwrap_or_default();
        response.extensions_mut().insert(Settlement::HandlerManaged);
        return response;
    }

    let (settlement, mut response) = match result.and_then(|value| Ok(Payload::json(&value)?)) {
        Ok(payload) => (Settlement::Sent, payload.into_response_with(StatusCode::OK)),
        Err(RouteError::Signal(signal)) => {
            let status = signal.status();
            (Settlement::ErrorResponse(status), signal.into_response())
        }
        Err(RouteError::Unexpected(err)) => (Settlement::Forwarded, forward(err)),
    };
    tracing::debug!(?settlement, status = %response.status(), "route settled");
    response.extensions_mut().insert(settlement);
    response
}
