//! Verb-fixed entry points over [`Binder::bind`].
//!
//! Each method pins the verb at the type level: `get` only accepts handlers
//! for routes the contract declares as `GET`, and so on. They add no
//! behavior of their own.

use crate::binder::Binder;
use crate::contract::{Contract, RouteDef};
use crate::error::BindError;
use crate::handler::{Middleware, RouteHandler};
use crate::verb::{self, Verb, VerbMarker};

macro_rules! verb_method {
    ($(#[$meta:meta])* $name:ident, $marker:ident) => {
        $(#[$meta])*
        pub fn $name<R, H, M>(
            &mut self,
            handler: H,
            middleware: impl IntoIterator<Item = Middleware>,
        ) -> Result<&mut Self, BindError>
        where
            R: RouteDef<Contract = C, Verb = verb::$marker>,
            H: RouteHandler<R, S, M>,
            M: 'static,
        {
            self.bind::<R, H, M>(R::PATH, Verb::$marker, handler, middleware)
        }
    };
}

impl<C, S> Binder<C, S>
where
    C: Contract,
    S: Clone + Send + Sync + 'static,
{
    verb_method!(
        /// Binds a `GET` route.
        get, Get
    );
    verb_method!(
        /// Binds a `POST` route.
        post, Post
    );
    verb_method!(
        /// Binds a `PUT` route.
        put, Put
    );
    verb_method!(
        /// Binds a `PATCH` route.
        patch, Patch
    );
    verb_method!(
        /// Binds a `HEAD` route.
        head, Head
    );
    verb_method!(
        /// Binds a `DELETE` route.
        delete, Delete
    );
    verb_method!(
        /// Binds an `OPTIONS` route.
        options, Options
    );

    /// Binds route `R` at its declared path with its declared verb.
    pub fn route<R, H, M>(
        &mut self,
        handler: H,
        middleware: impl IntoIterator<Item = Middleware>,
    ) -> Result<&mut Self, BindError>
    where
        R: RouteDef<Contract = C>,
        H: RouteHandler<R, S, M>,
        M: 'static,
    {
        self.bind::<R, H, M>(R::PATH, <R::Verb as VerbMarker>::VERB, handler, middleware)
    }
}
