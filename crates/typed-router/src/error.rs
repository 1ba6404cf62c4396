//! Registration-time errors for typed-router.
//!
//! Uses `thiserror` for matchable variants. These are only produced while
//! routes are being bound; request-time failures travel as
//! [`RouteError`](crate::signal::RouteError) instead.

use thiserror::Error;

use crate::verb::Verb;

/// Errors returned when a route cannot be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The route path was the empty string.
    #[error("route path must not be empty")]
    EmptyPath,

    /// The route path is not in the router's `/segment/{param}` syntax.
    #[error("invalid route path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// A method string did not name one of the supported verbs.
    #[error("unsupported HTTP method '{method}'")]
    InvalidMethod { method: String },

    /// The same (path, verb) pair was bound twice.
    #[error("route {verb} {path} is already bound")]
    Duplicate { path: String, verb: Verb },

    /// The path differs from an already bound path only in capture names,
    /// which the router cannot tell apart.
    #[error("route path '{path}' conflicts with '{existing}': capture names differ")]
    ConflictingCapture { path: String, existing: String },

    /// The verb passed at bind time disagrees with the contract's verb.
    #[error("route {path} is declared as {declared} but was bound as {requested}")]
    VerbMismatch {
        path: String,
        declared: Verb,
        requested: Verb,
    },
}

/// Checks a path before it is handed to the router.
///
/// The router itself panics on malformed paths; this turns the common
/// mistakes into a [`BindError`] at registration time.
pub(crate) fn validate_path(path: &str) -> Result<(), BindError> {
    if path.is_empty() {
        return Err(BindError::EmptyPath);
    }
    if !path.starts_with('/') {
        return Err(BindError::InvalidPath {
            path: path.to_string(),
            reason: "path must start with '/'",
        });
    }
    if path.contains("//") {
        return Err(BindError::InvalidPath {
            path: path.to_string(),
            reason: "path contains an empty segment",
        });
    }
    for segment in path.split('/') {
        let opens = segment.matches('{').count();
        let closes = segment.matches('}').count();
        if opens != closes || opens > 1 {
            return Err(BindError::InvalidPath {
                path: path.to_string(),
                reason: "unbalanced or repeated '{param}' capture",
            });
        }
        if segment.starts_with(':') {
            return Err(BindError::InvalidPath {
                path: path.to_string(),
                reason: "use '{param}' captures instead of ':param'",
            });
        }
    }
    Ok(())
}

/// The path with every capture name erased, so `/users/{id}` and
/// `/users/{name}` share the shape `/users/{}`. Wildcards keep their `*`.
pub(crate) fn route_shape(path: &str) -> String {
    let mut shape = String::with_capacity(path.len());
    let mut in_capture = false;
    for ch in path.chars() {
        match ch {
            '{' => {
                in_capture = true;
                shape.push('{');
            }
            '}' => {
                in_capture = false;
                shape.push('}');
            }
            '*' if in_capture => shape.push('*'),
            _ if in_capture => {}
            _ => shape.push(ch),
        }
    }
    shape
}
