//! Typed async route handlers for axum, checked against a route contract.
//!
//! Handlers are plain `async fn`s that take a [`TypedRequest`] for one
//! contract route and resolve to that route's response type or a
//! [`RouteError`]. The [`Binder`] registers them with an axum [`Router`]
//! and guarantees exactly one terminal action per request:
//!
//! - a successful value is serialized and sent,
//! - an [`HttpSignal`] becomes its status and payload,
//! - any other failure is forwarded to the [`ErrorPipeline`],
//! - a response the handler already wrote through its [`ResponseWriter`]
//!   is left alone.
//!
//! [`Router`]: axum::Router

pub mod binder;
pub mod contract;
pub mod error;
pub mod facade;
pub mod handler;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod settle;
pub mod signal;
pub mod verb;

pub use binder::{Binder, DispatchMode};
pub use contract::{Contract, Empty, RouteDef};
pub use error::BindError;
pub use handler::{Middleware, RouteHandler};
pub use pipeline::{forward, ErrorPipeline, ForwardedError};
pub use request::TypedRequest;
pub use response::ResponseWriter;
pub use settle::Settlement;
pub use signal::{route_error, BoxError, HttpSignal, Payload, RouteError};
pub use verb::Verb;
