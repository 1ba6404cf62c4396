//! Router assembly for the users API.
//!
//! [`build_router`] binds every [`UsersApi`] route through the typed binder,
//! then adds CORS and tracing layers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use typed_router::pipeline::ErrorDetail;
use typed_router::{BindError, Binder, DispatchMode};

use crate::handlers;
use crate::middleware::{request_id, require_client_id};
use crate::schema::UsersApi;
use crate::state::AppState;

/// JSON 404 for unmatched paths, and in catch-all mode for unbound verbs.
async fn route_not_found() -> Response {
    let detail = ErrorDetail {
        code: "ROUTE_NOT_FOUND".to_string(),
        message: "no route for this request".to_string(),
    };
    let body = serde_json::json!({
        "success": false,
        "error": detail,
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Builds the complete router.
///
/// Mutating routes require an `X-Client-Id`. Every bound route echoes or
/// assigns an `X-Request-Id`.
pub fn build_router(state: AppState, mode: DispatchMode) -> Result<Router, BindError> {
    let mut binder = Binder::<UsersApi, AppState>::with_mode(Router::new(), mode);

    binder
        // Health
        .get(handlers::health::health, [])?
        .head(handlers::health::health_probe, [])?
        // Users
        .get(handlers::users::list_users, [])?
        .post(handlers::users::create_user, [require_client_id()])?
        .get(handlers::users::get_user, [])?
        .put(handlers::users::replace_user, [require_client_id()])?
        .patch(handlers::users::update_user, [require_client_id()])?
        .delete(handlers::users::delete_user, [require_client_id()])?
        .get(handlers::users::export_user, [])?
        .fallback(route_not_found)
        .use_middleware(request_id());

    Ok(binder
        .into_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}
