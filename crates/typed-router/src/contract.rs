//! Compile-time route contracts.
//!
//! A [`Contract`] names an API; each [`RouteDef`] ties one (path, verb) pair
//! of that API to its request and response shapes. Nothing here runs at
//! request time: the types only constrain which handlers can be bound to
//! which routes.
//!
//! Contracts are usually declared with [`api_contract!`](crate::api_contract):
//!
//! ```ignore
//! typed_router::api_contract! {
//!     pub contract UsersApi {
//!         GetUser: GET "/users/{id}" {
//!             params: UserParams,
//!             response: User,
//!         }
//!         CreateUser: POST "/users" {
//!             body: CreateUserRequest,
//!             response: User,
//!         }
//!     }
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::verb::VerbMarker;

/// Marker for an API definition.
pub trait Contract: Send + Sync + 'static {}

/// The static shape of one route in a [`Contract`].
pub trait RouteDef: Send + Sync + 'static {
    /// The API this route belongs to.
    type Contract: Contract;
    /// The verb the route is declared with.
    type Verb: VerbMarker;
    /// Path pattern in the router's `/{param}` syntax.
    const PATH: &'static str;

    /// Path captures.
    type Params: DeserializeOwned + Send + 'static;
    /// Query string.
    type Query: DeserializeOwned + Send + 'static;
    /// JSON request body.
    type Body: DeserializeOwned + Send + 'static;
    /// Value the handler resolves to on success.
    type Response: Serialize + Send + 'static;
}

/// Placeholder for params, query, or body a route does not declare.
///
/// Deserializes from an empty map and ignores unknown keys, so it also
/// accepts a route whose path has captures the handler does not care about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Declares a contract type and one unit struct per route.
///
/// `params`, `query` and `body` are optional and default to [`Empty`];
/// `response` is required. The verb must be one of `GET`, `POST`, `PUT`,
/// `PATCH`, `HEAD`, `DELETE`, `OPTIONS`; anything else fails to compile.
#[macro_export]
macro_rules! api_contract {
    (
        $(#[$cmeta:meta])*
        $cvis:vis contract $contract:ident {
            $(
                $(#[$rmeta:meta])*
                $route:ident : $verb:ident $path:literal {
                    $(params: $params:ty,)?
                    $(query: $query:ty,)?
                    $(body: $body:ty,)?
                    response: $response:ty $(,)?
                }
            )*
        }
    ) => {
        $(#[$cmeta])*
        #[derive(Debug, Clone, Copy, Default)]
        $cvis struct $contract;

        impl $crate::contract::Contract for $contract {}

        $(
            $(#[$rmeta])*
            #[derive(Debug, Clone, Copy, Default)]
            $cvis struct $route;

            impl $crate::contract::RouteDef for $route {
                type Contract = $contract;
                type Verb = $crate::__verb_marker!($verb);
                const PATH: &'static str = $path;
                type Params = $crate::__or_empty!($($params)?);
                type Query = $crate::__or_empty!($($query)?);
                type Body = $crate::__or_empty!($($body)?);
                type Response = $response;
            }
        )*
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __verb_marker {
    (GET) => { $crate::verb::Get };
    (POST) => { $crate::verb::Post };
    (PUT) => { $crate::verb::Put };
    (PATCH) => { $crate::verb::Patch };
    (HEAD) => { $crate::verb::Head };
    (DELETE) => { $crate::verb::Delete };
    (OPTIONS) => { $crate::verb::Options };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __or_empty {
    () => { $crate::contract::Empty };
    ($ty:ty) => { $ty };
}
