//! Handler and middleware shapes accepted by the binder.
//!
//! A route handler is any `async fn` (or closure) taking a
//! [`TypedRequest`] and, optionally, a [`ResponseWriter`], resolving to
//! `Result<R::Response, RouteError>`. The route `R` is inferred from the
//! handler's request type, so a handler written against one contract route
//! cannot be bound to another.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::contract::RouteDef;
use crate::request::TypedRequest;
use crate::response::ResponseWriter;
use crate::signal::RouteError;

/// Boxed future returned by an adapted handler.
pub type HandlerFuture<T> = Pin<Box<dyn Future<Output = Result<T, RouteError>> + Send>>;

/// An async function bindable to route `R`.
///
/// `M` only distinguishes the supported argument lists; callers never name it.
pub trait RouteHandler<R: RouteDef, S, M>: Clone + Send + Sync + 'static {
    fn call(&self, req: TypedRequest<R, S>, res: ResponseWriter) -> HandlerFuture<R::Response>;
}

#[doc(hidden)]
pub struct RequestOnly;

#[doc(hidden)]
pub struct WithWriter;

impl<R, S, F, Fut> RouteHandler<R, S, RequestOnly> for F
where
    R: RouteDef,
    F: Fn(TypedRequest<R, S>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Response, RouteError>> + Send + 'static,
{
    fn call(&self, req: TypedRequest<R, S>, _res: ResponseWriter) -> HandlerFuture<R::Response> {
        Box::pin((self)(req))
    }
}

impl<R, S, F, Fut> RouteHandler<R, S, WithWriter> for F
where
    R: RouteDef,
    F: Fn(TypedRequest<R, S>, ResponseWriter) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<R::Response, RouteError>> + Send + 'static,
{
    fn call(&self, req: TypedRequest<R, S>, res: ResponseWriter) -> HandlerFuture<R::Response> {
        Box::pin((self)(req, res))
    }
}

type MiddlewareFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A conventional `(request, next)` middleware run ahead of a route handler.
///
/// It either answers the request itself or calls `next.run(request)` to
/// proceed; to hand a failure to the error pipeline it returns
/// [`forward(err)`](crate::pipeline::forward).
#[derive(Clone)]
pub struct Middleware(Arc<dyn Fn(Request, Next) -> MiddlewareFuture + Send + Sync>);

impl Middleware {
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: IntoResponse,
    {
        Middleware(Arc::new(move |req: Request, next: Next| -> MiddlewareFuture {
            let fut = f(req, next);
            Box::pin(async move { fut.await.into_response() })
        }))
    }

    pub(crate) fn run(&self, req: Request, next: Next) -> MiddlewareFuture {
        (self.0)(req, next)
    }
}

impl std::fmt::Debug for Middleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Middleware")
    }
}

/// Wraps `route` so that `middleware` runs in order before it.
///
/// The last layer applied is the outermost, so the list is applied back to
/// front.
pub(crate) fn layer_middleware<S>(
    mut route: axum::routing::MethodRouter<S>,
    middleware: &[Middleware],
) -> axum::routing::MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    for mw in middleware.iter().rev().cloned() {
        route = route.layer(axum::middleware::from_fn(
            move |req: Request, next: Next| mw.run(req, next),
        ));
    }
    route
}
