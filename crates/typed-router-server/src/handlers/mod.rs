//! HTTP handler modules for the users API.
//!
//! Each handler is an `async fn` over one contract route: it reads the typed
//! request, delegates to the [`UserStore`](crate::state::UserStore), and
//! returns the route's response type. No routing logic lives here.

pub mod health;
pub mod users;
