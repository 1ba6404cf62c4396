//! Liveness handlers.

use typed_router::{RouteError, TypedRequest};

use crate::schema::users::HealthResponse;
use crate::schema::{Health, HealthProbe};
use crate::state::AppState;

/// `GET /health`
pub async fn health(req: TypedRequest<Health, AppState>) -> Result<HealthResponse, RouteError> {
    Ok(HealthResponse {
        status: "ok",
        users: req.state.users.len(),
    })
}

/// `HEAD /health`
pub async fn health_probe(_req: TypedRequest<HealthProbe, AppState>) -> Result<(), RouteError> {
    Ok(())
}
