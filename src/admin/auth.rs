//! Bearer-key protection for mutating endpoints.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::request::request_id;
use crate::http::server::AppState;

/// Methods that never change the catalog.
fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Rejects mutating requests without `Authorization: Bearer <api_key>`.
/// Passes everything through when no key is configured.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(api_key) = state.api_key.as_deref() else {
        return next.run(request).await;
    };
    if is_read_only(request.method()) {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(api_key) {
        return next.run(request).await;
    }

    tracing::warn!(
        request_id = request_id(&request).unwrap_or("unknown"),
        method = %request.method(),
        path = %request.uri().path(),
        "Rejected unauthenticated request"
    );
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "missing or invalid bearer key" })),
    )
        .into_response()
}
