//! The error-handling continuation for unexpected failures.
//!
//! Adapted handlers never render an unexpected failure themselves. They return
//! a placeholder response tagged with a [`ForwardedError`] extension, and the
//! [`ErrorPipeline`] installed around the router turns it into the final
//! response. Middleware can forward failures the same way with [`forward`].

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::settle::Settlement;
use crate::signal::BoxError;

/// An unexpected failure on its way to the error pipeline.
///
/// Shares the original error value, so renderers can downcast it.
#[derive(Clone)]
pub struct ForwardedError(Arc<BoxError>);

impl ForwardedError {
    pub fn new(err: impl Into<BoxError>) -> Self {
        ForwardedError(Arc::new(err.into()))
    }

    pub fn error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &**self.0
    }

    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.error().downcast_ref::<E>()
    }
}

impl fmt::Debug for ForwardedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ForwardedError").field(&self.0).finish()
    }
}

impl fmt::Display for ForwardedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.error(), f)
    }
}

/// Builds the placeholder response that forwards `err` to the pipeline.
pub fn forward(err: impl Into<BoxError>) -> Response {
    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response
        .extensions_mut()
        .insert(ForwardedError::new(err));
    response
}

/// Error body rendered by [`default_renderer`].
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Logs the failure and answers with a generic 500 JSON body.
pub fn default_renderer(err: ForwardedError) -> Response {
    tracing::error!(error = %err, "unhandled route failure");
    let detail = ErrorDetail {
        code: "INTERNAL_ERROR".to_string(),
        message: "internal server error".to_string(),
    };
    let body = serde_json::json!({
        "success": false,
        "error": detail,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}

type Renderer = dyn Fn(ForwardedError) -> Response + Send + Sync;

/// Renders forwarded failures into final responses.
#[derive(Clone)]
pub struct ErrorPipeline {
    renderer: Arc<Renderer>,
}

impl ErrorPipeline {
    pub fn new<F>(renderer: F) -> Self
    where
        F: Fn(ForwardedError) -> Response + Send + Sync + 'static,
    {
        ErrorPipeline {
            renderer: Arc::new(renderer),
        }
    }

    /// Passes ordinary responses through and renders forwarded ones.
    pub fn render(&self, mut response: Response) -> Response {
        let Some(err) = response.extensions_mut().remove::<ForwardedError>() else {
            return response;
        };
        let mut rendered = (self.renderer)(err);
        rendered.extensions_mut().insert(Settlement::Forwarded);
        rendered
    }
}

impl Default for ErrorPipeline {
    fn default() -> Self {
        ErrorPipeline::new(default_renderer)
    }
}

impl fmt::Debug for ErrorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorPipeline").finish_non_exhaustive()
    }
}
