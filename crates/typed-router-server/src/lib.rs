//! Example users service built on `typed-router`.
//!
//! Schema types and the route contract live in [`schema`]; handlers in
//! [`handlers`] are bound against that contract by [`router::build_router`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod schema;
pub mod state;
