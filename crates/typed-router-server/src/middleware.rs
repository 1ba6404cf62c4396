//! Middleware used by the users API.

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::Json;
use typed_router::pipeline::ErrorDetail;
use typed_router::Middleware;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Echoes the caller's `X-Request-Id`, or assigns a fresh UUID.
pub fn request_id() -> Middleware {
    Middleware::from_fn(|req, next: Next| async move {
        let id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .cloned()
            .unwrap_or_else(|| {
                HeaderValue::from_str(&Uuid::new_v4().to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("invalid"))
            });
        let mut response = next.run(req).await;
        response.headers_mut().insert(REQUEST_ID_HEADER, id);
        response
    })
}

/// Extracts the client id from the `X-Client-Id` header.
pub fn client_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
}

/// Rejects requests without a valid `X-Client-Id` before the handler runs.
pub fn require_client_id() -> Middleware {
    Middleware::from_fn(|req, next: Next| async move {
        if client_id(req.headers()).is_none() {
            tracing::debug!(uri = %req.uri(), "rejecting request without client id");
            let detail = ErrorDetail {
                code: "CLIENT_REQUIRED".to_string(),
                message: "X-Client-Id header required".to_string(),
            };
            let body = serde_json::json!({
                "success": false,
                "error": detail,
            });
            return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        }
        next.run(req).await
    })
}
