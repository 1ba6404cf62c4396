//! The dispatch binder: registers typed async handlers with an axum router.
//!
//! [`Binder`] owns the router it registers into. Each bound route is wrapped
//! so that per-route middleware runs first, the request is decoded into the
//! route's declared shapes, the handler runs, and its outcome is
//! [settled](crate::settle::settle) into exactly one response. Unexpected
//! failures reach the [`ErrorPipeline`] installed by [`Binder::into_router`].

use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::handler::Handler;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, on, MethodRouter};
use axum::Router;
use serde::Serialize;
use tower::ServiceExt;

use crate::contract::{Contract, RouteDef};
use crate::error::{route_shape, validate_path, BindError};
use crate::handler::{layer_middleware, Middleware, RouteHandler};
use crate::pipeline::{ErrorPipeline, ForwardedError};
use crate::request::TypedRequest;
use crate::response::ResponseWriter;
use crate::settle::settle;
use crate::signal::RouteError;
use crate::verb::{Verb, VerbMarker};

/// How routes are registered with the router.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Verb-specific registration through the router's method filters.
    #[default]
    Native,
    /// One any-verb entry per path that filters on the request method itself
    /// and skips entries bound to other verbs.
    ///
    /// A `HEAD` request with no `HEAD` entry is served by the `GET` entry, as
    /// in native mode. A request with no matching entry continues to the
    /// fallback set with [`Binder::fallback`], or gets a 404 without one.
    CatchAll,
}

type Entries<S> = Vec<(Verb, MethodRouter<S>)>;

/// The entries bound to one path in catch-all mode.
struct CatchAllTable<S> {
    entries: Entries<S>,
    fallback: Option<MethodRouter<S>>,
}

impl<S> CatchAllTable<S> {
    fn entry_for(&self, method: &Method) -> Option<&MethodRouter<S>> {
        let find = |verb: Verb| {
            self.entries
                .iter()
                .find(|(bound, _)| *bound == verb)
                .map(|(_, endpoint)| endpoint)
        };
        let exact = Verb::try_from(method).ok().and_then(find);
        if exact.is_none() && *method == Method::HEAD {
            return find(Verb::Get);
        }
        exact
    }
}

/// Binds handlers for routes of contract `C` onto a `Router<S>`.
pub struct Binder<C, S = ()> {
    router: Router<S>,
    mode: DispatchMode,
    bound: HashSet<(String, Verb)>,
    shapes: HashMap<String, String>,
    catch_all: HashMap<String, Entries<S>>,
    fallback: Option<MethodRouter<S>>,
    pipeline: ErrorPipeline,
    _contract: PhantomData<fn() -> C>,
}

impl<C, S> Binder<C, S>
where
    C: Contract,
    S: Clone + Send + Sync + 'static,
{
    /// Wraps `router` using native verb registration.
    pub fn new(router: Router<S>) -> Self {
        Binder::with_mode(router, DispatchMode::Native)
    }

    pub fn with_mode(router: Router<S>, mode: DispatchMode) -> Self {
        Binder {
            router,
            mode,
            bound: HashSet::new(),
            shapes: HashMap::new(),
            catch_all: HashMap::new(),
            fallback: None,
            pipeline: ErrorPipeline::default(),
            _contract: PhantomData,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Sets the router's fallback for requests no route matches.
    ///
    /// In catch-all mode a request whose path is bound but whose method is
    /// not also continues to this fallback. A fallback already set on the
    /// router passed to [`new`](Self::new) is not visible to the binder and
    /// only sees unmatched paths.
    pub fn fallback<H, T>(&mut self, handler: H) -> &mut Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let router = std::mem::take(&mut self.router);
        self.router = router.fallback(handler.clone());
        self.fallback = Some(any(handler));
        self
    }

    /// Replaces the default renderer for forwarded failures.
    pub fn on_error<F>(&mut self, renderer: F) -> &mut Self
    where
        F: Fn(ForwardedError) -> Response + Send + Sync + 'static,
    {
        self.pipeline = ErrorPipeline::new(renderer);
        self
    }

    /// Binds `handler` for route `R` at `path` and `verb`.
    ///
    /// `verb` must agree with the verb `R` is declared with. `path` is
    /// normally `R::PATH`; a different path mounts the same contract route
    /// elsewhere (e.g. under a version prefix).
    pub fn bind<R, H, M>(
        &mut self,
        path: &str,
        verb: Verb,
        handler: H,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> Result<&mut Self, BindError>
    where
        R: RouteDef<Contract = C>,
        H: RouteHandler<R, S, M>,
        M: 'static,
    {
        let declared = <R::Verb as VerbMarker>::VERB;
        if declared != verb {
            return Err(BindError::VerbMismatch {
                path: path.to_string(),
                declared,
                requested: verb,
            });
        }

        let endpoint = on(
            verb.filter(),
            move |State(state): State<S>, req: Request| {
                let handler = handler.clone();
                async move { dispatch::<R, S, H, M>(handler, state, req).await }
            },
        );
        self.register(path, verb, endpoint, middleware)
    }

    /// Binds an untyped handler that receives the whole request.
    ///
    /// `method` is parsed case-insensitively into a [`Verb`].
    pub fn route_raw<F, Fut, T>(
        &mut self,
        path: &str,
        method: &str,
        handler: F,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> Result<&mut Self, BindError>
    where
        F: Fn(Request, ResponseWriter) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T, RouteError>> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let verb: Verb = method.parse()?;
        let endpoint = on(verb.filter(), move |req: Request| {
            let handler = handler.clone();
            async move {
                let writer = ResponseWriter::new();
                let result = handler(req, writer.clone()).await;
                settle(result, &writer)
            }
        });
        self.register(path, verb, endpoint, middleware)
    }

    /// Applies `layer` to every route bound so far, without adaptation.
    ///
    /// Routes bound afterwards are not wrapped, in either dispatch mode.
    pub fn use_layer<L>(&mut self, layer: L) -> &mut Self
    where
        L: tower::Layer<axum::routing::Route> + Clone + Send + Sync + 'static,
        L::Service: tower::Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as tower::Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as tower::Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as tower::Service<Request>>::Future: Send + 'static,
    {
        // catch-all entries reach the router only in `into_router`, so they
        // are layered one by one here
        for entries in self.catch_all.values_mut() {
            for (_, endpoint) in entries.iter_mut() {
                *endpoint = endpoint.clone().layer(layer.clone());
            }
        }
        if let Some(fallback) = self.fallback.take() {
            self.fallback = Some(fallback.layer(layer.clone()));
        }

        let router = std::mem::take(&mut self.router);
        self.router = router.layer(layer);
        self
    }

    /// Applies a `(request, next)` middleware to every route bound so far.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.use_layer(axum::middleware::from_fn(
            move |req: Request, next: axum::middleware::Next| middleware.run(req, next),
        ))
    }

    /// Finishes registration, installing the error pipeline.
    pub fn into_router(self) -> Router<S> {
        let pipeline = self.pipeline;
        let mut router = self.router;
        for (path, entries) in self.catch_all {
            let table = Arc::new(CatchAllTable {
                entries,
                fallback: self.fallback.clone(),
            });
            router = router.route(
                &path,
                any(move |State(state): State<S>, req: Request| {
                    let table = Arc::clone(&table);
                    async move { dispatch_by_method(&table, state, req).await }
                }),
            );
        }
        router
            .layer(axum::middleware::map_response(move |response: Response| {
                let pipeline = pipeline.clone();
                async move { pipeline.render(response) }
            }))
    }

    fn register(
        &mut self,
        path: &str,
        verb: Verb,
        endpoint: MethodRouter<S>,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> Result<&mut Self, BindError> {
        validate_path(path)?;
        let shape = route_shape(path);
        if let Some(existing) = self.shapes.get(&shape) {
            if existing != path {
                return Err(BindError::ConflictingCapture {
                    path: path.to_string(),
                    existing: existing.clone(),
                });
            }
        }
        let key = (path.to_string(), verb);
        if self.bound.contains(&key) {
            return Err(BindError::Duplicate {
                path: path.to_string(),
                verb,
            });
        }

        let middleware: Vec<Middleware> = middleware.into_iter().collect();
        let endpoint = layer_middleware(endpoint, &middleware);

        match self.mode {
            DispatchMode::Native => {
                let router = std::mem::take(&mut self.router);
                self.router = router.route(path, endpoint);
            }
            DispatchMode::CatchAll => {
                self.catch_all
                    .entry(path.to_string())
                    .or_default()
                    .push((verb, endpoint));
            }
        }

        tracing::debug!(
            path,
            %verb,
            mode = ?self.mode,
            middleware = middleware.len(),
            "bound route"
        );
        self.bound.insert(key);
        self.shapes.insert(shape, path.to_string());
        Ok(self)
    }
}

/// Runs one adapted request: decode, call the handler, settle.
async fn dispatch<R, S, H, M>(handler: H, state: S, req: Request) -> Response
where
    R: RouteDef,
    S: Clone + Send + Sync + 'static,
    H: RouteHandler<R, S, M>,
{
    let writer = ResponseWriter::new();
    let result = match TypedRequest::<R, S>::extract(req, state).await {
        Ok(typed) => handler.call(typed, writer.clone()).await,
        Err(signal) => Err(RouteError::Signal(signal)),
    };
    settle(result, &writer)
}

/// Catch-all entry point for one path.
///
/// An entry bound to another verb is passed over untouched. If none matches,
/// the request continues to the binder's fallback, or gets a 404 without one.
async fn dispatch_by_method<S>(table: &CatchAllTable<S>, state: S, req: Request) -> Response
where
    S: Clone + Send + Sync + 'static,
{
    let endpoint = match table.entry_for(req.method()) {
        Some(endpoint) => endpoint.clone(),
        None => {
            tracing::trace!(method = %req.method(), uri = %req.uri(), "no entry for method; continuing");
            match &table.fallback {
                Some(fallback) => fallback.clone(),
                None => return StatusCode::NOT_FOUND.into_response(),
            }
        }
    };

    match endpoint.with_state::<()>(state).oneshot(req).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}
