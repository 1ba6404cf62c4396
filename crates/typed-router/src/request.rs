//! Typed view of an incoming request.

use std::fmt;

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path, Query, Request};
use axum::http::{Extensions, HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;

use crate::contract::RouteDef;
use crate::signal::HttpSignal;

/// Largest JSON body accepted before the request is rejected.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// A request whose params, query and body have been decoded into the shapes
/// declared by route `R`.
pub struct TypedRequest<R: RouteDef, S = ()> {
    pub params: R::Params,
    pub query: R::Query,
    pub body: R::Body,
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub extensions: Extensions,
    /// Router state.
    pub state: S,
}

impl<R, S> TypedRequest<R, S>
where
    R: RouteDef,
    S: Send + Sync,
{
    /// Decodes `req` according to `R`.
    ///
    /// Decoding failures are reported as 400 signals carrying the reason.
    pub async fn extract(req: Request, state: S) -> Result<Self, HttpSignal> {
        let (mut parts, body) = req.into_parts();

        let params = match Path::<R::Params>::from_request_parts(&mut parts, &state).await {
            Ok(Path(params)) => params,
            Err(PathRejection::MissingPathParams(rejection)) => {
                absent().ok_or_else(|| HttpSignal::bad_request(rejection.body_text()))?
            }
            Err(rejection) => return Err(HttpSignal::bad_request(rejection.body_text())),
        };

        let query = match Query::<R::Query>::try_from_uri(&parts.uri) {
            Ok(Query(query)) => query,
            Err(rejection) => match parts.uri.query() {
                None | Some("") => {
                    absent().ok_or_else(|| HttpSignal::bad_request(rejection.body_text()))?
                }
                Some(_) => return Err(HttpSignal::bad_request(rejection.body_text())),
            },
        };

        let bytes = axum::body::to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|err| HttpSignal::bad_request(format!("failed to read body: {}", err)))?;
        let body = if bytes.is_empty() {
            absent().ok_or_else(|| HttpSignal::bad_request("request body is required"))?
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|err| HttpSignal::bad_request(format!("invalid JSON body: {}", err)))?
        };

        Ok(TypedRequest {
            params,
            query,
            body,
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            extensions: parts.extensions,
            state,
        })
    }
}

impl<R: RouteDef, S> fmt::Debug for TypedRequest<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRequest")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

/// Value for a part the client left out, if the declared shape tolerates it:
/// an empty map first (structs with optional fields, `Empty`), then `null`
/// (`()` and `Option`).
fn absent<T: DeserializeOwned>() -> Option<T> {
    serde_json::from_value(serde_json::Value::Object(Default::default()))
        .or_else(|_| serde_json::from_value(serde_json::Value::Null))
        .ok()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::contract::Empty;
    use crate::signal::Payload;

    #[derive(Debug, Deserialize)]
    struct Search {
        term: Option<String>,
    }

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Signup {
        email: String,
    }

    crate::api_contract! {
        contract TestApi {
            Find: GET "/things" {
                query: Search,
                response: (),
            }
            Register: POST "/signup" {
                body: Signup,
                response: (),
            }
        }
    }

    #[test]
    fn absent_accepts_tolerant_shapes() {
        assert_eq!(absent::<Empty>(), Some(Empty {}));
        assert_eq!(absent::<()>(), Some(()));
        assert_eq!(absent::<Option<u32>>(), Some(None));
        assert!(absent::<Signup>().is_none());
    }

    #[tokio::test]
    async fn decodes_query_without_path_params() {
        let req = Request::builder()
            .uri("/things?term=ada")
            .body(Body::empty())
            .unwrap();
        let typed = TypedRequest::<Find>::extract(req, ()).await.unwrap();
        assert_eq!(typed.query.term.as_deref(), Some("ada"));
        assert_eq!(typed.params, Empty {});
    }

    #[tokio::test]
    async fn decodes_json_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/signup")
            .body(Body::from(r#"{"email":"ada@example.com"}"#))
            .unwrap();
        let typed = TypedRequest::<Register>::extract(req, ()).await.unwrap();
        assert_eq!(typed.body.email, "ada@example.com");
    }

    #[tokio::test]
    async fn malformed_body_is_a_400_signal() {
        let req = Request::builder()
            .method("POST")
            .uri("/signup")
            .body(Body::from("{not json"))
            .unwrap();
        let signal = TypedRequest::<Register>::extract(req, ()).await.unwrap_err();
        assert_eq!(signal.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(signal.payload(), Payload::Text(text) if text.starts_with("invalid JSON body")));
    }

    #[tokio::test]
    async fn missing_required_body_is_a_400_signal() {
        let req = Request::builder()
            .method("POST")
            .uri("/signup")
            .body(Body::empty())
            .unwrap();
        let signal = TypedRequest::<Register>::extract(req, ()).await.unwrap_err();
        assert_eq!(
            signal.payload(),
            &Payload::Text("request body is required".to_string())
        );
    }
}
