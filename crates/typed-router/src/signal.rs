//! Handler failures: intentional HTTP signals and unexpected errors.
//!
//! A handler resolves to `Result<T, RouteError>`. [`RouteError::Signal`]
//! asks for a specific status and body and is always answered locally.
//! [`RouteError::Unexpected`] is forwarded untouched to the error pipeline.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Boxed error forwarded to the error pipeline.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Response body carried by a signal or produced from a handler value.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No body.
    Empty,
    /// `text/plain` body.
    Text(String),
    /// `application/json` body.
    Json(serde_json::Value),
}

impl Payload {
    /// Serializes `value` into a payload.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Payload::from_value)
    }

    /// Strings become text, `null` becomes no body, everything else is JSON.
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Payload::Empty,
            serde_json::Value::String(text) => Payload::Text(text),
            other => Payload::Json(other),
        }
    }

    pub(crate) fn into_response_with(self, status: StatusCode) -> Response {
        match self {
            Payload::Empty => status.into_response(),
            Payload::Text(text) => (status, text).into_response(),
            Payload::Json(value) => (status, axum::Json(value)).into_response(),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::from_value(value)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

/// A deliberately raised HTTP error response.
///
/// The status defaults to 500 when it is unset or was given as a code that is
/// not a valid HTTP status (including 0).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSignal {
    status: Option<StatusCode>,
    payload: Payload,
}

impl HttpSignal {
    pub fn new(status: StatusCode, payload: impl Into<Payload>) -> Self {
        HttpSignal {
            status: Some(status),
            payload: payload.into(),
        }
    }

    /// Builds a signal from a raw numeric code.
    pub fn from_code(code: u16, payload: impl Into<Payload>) -> Self {
        HttpSignal {
            status: StatusCode::from_u16(code).ok(),
            payload: payload.into(),
        }
    }

    /// A signal with no explicit status; answered with 500.
    pub fn payload_only(payload: impl Into<Payload>) -> Self {
        HttpSignal {
            status: None,
            payload: payload.into(),
        }
    }

    pub fn bad_request(payload: impl Into<Payload>) -> Self {
        HttpSignal::new(StatusCode::BAD_REQUEST, payload)
    }

    pub fn not_found(payload: impl Into<Payload>) -> Self {
        HttpSignal::new(StatusCode::NOT_FOUND, payload)
    }

    /// The status the response will carry.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

impl fmt::Display for HttpSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Empty => write!(f, "{}", self.status()),
            Payload::Text(text) => write!(f, "{}: {}", self.status(), text),
            Payload::Json(value) => write!(f, "{}: {}", self.status(), value),
        }
    }
}

impl IntoResponse for HttpSignal {
    fn into_response(self) -> Response {
        let status = self.status();
        self.payload.into_response_with(status)
    }
}

/// The failure half of a handler's result.
#[derive(Debug)]
pub enum RouteError {
    /// Answer with this status and payload.
    Signal(HttpSignal),
    /// Hand the error to the error pipeline.
    Unexpected(BoxError),
}

impl RouteError {
    /// Wraps any error as an unexpected failure.
    pub fn unexpected(err: impl Into<BoxError>) -> Self {
        RouteError::Unexpected(err.into())
    }

    pub fn as_signal(&self) -> Option<&HttpSignal> {
        match self {
            RouteError::Signal(signal) => Some(signal),
            RouteError::Unexpected(_) => None,
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::Signal(signal) => write!(f, "route signal {}", signal),
            RouteError::Unexpected(err) => write!(f, "unexpected failure: {}", err),
        }
    }
}

impl From<HttpSignal> for RouteError {
    fn from(signal: HttpSignal) -> Self {
        RouteError::Signal(signal)
    }
}

impl From<BoxError> for RouteError {
    fn from(err: BoxError) -> Self {
        RouteError::Unexpected(err)
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        RouteError::Unexpected(Box::new(err))
    }
}

/// Shorthand for `RouteError::Signal(HttpSignal::new(status, payload))`.
pub fn route_error(status: StatusCode, payload: impl Into<Payload>) -> RouteError {
    RouteError::Signal(HttpSignal::new(status, payload))
}
