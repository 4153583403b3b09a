//! Shared builders for integration tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;

use route_catalog::capture::{RequestDescriptor, ResponseDescriptor};
use route_catalog::catalog::{InsertOutcome, RouteStore};

pub const HOST: &str = "test.com";

/// A POST to `HOST` with no headers or body.
pub fn simple_request(path: &str) -> RequestDescriptor {
    RequestDescriptor::new("POST", HOST, path)
}

/// Record `body` as the 200 JSON response for a POST to `path`.
pub fn insert(store: &mut RouteStore, path: &str, body: Value) -> InsertOutcome {
    store
        .insert(&simple_request(path), &ResponseDescriptor::json(200, body))
        .unwrap()
}

/// Type names of the `foo` property on the route matching `path`.
pub fn foo_types(store: &RouteStore, path: &str) -> Vec<&'static str> {
    store
        .lookup(HOST, path)
        .unwrap()
        .unwrap_or_else(|| panic!("no route matches {path}"))
        .response_body("POST", 200, "application/json")
        .and_then(|body| body.property("foo"))
        .map(|foo| foo.kind.names())
        .unwrap_or_default()
}

/// Build a JSON request for the service.
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON (`Null` when empty).
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
