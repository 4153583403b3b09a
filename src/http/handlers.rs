//! Endpoint handlers.
//!
//! Each handler locks the store for exactly one store call (or one batch, for
//! HAR uploads) and maps [`CatalogError`] onto a status code.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::capture::{normalize_host, Har, RequestDescriptor, ResponseDescriptor};
use crate::catalog::{
    CatalogError, InsertOutcome, LeafData, PartialStoreOptions, RouteStore, Snapshot, StoreOptions,
};
use crate::http::server::AppState;
use crate::openapi;

/// Error returned by a handler.
#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
    NotFound(String),
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        ApiError::Catalog(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Catalog(e) => {
                let status = match e {
                    CatalogError::InvalidParameterization(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    CatalogError::CorruptSnapshot(_) => StatusCode::BAD_REQUEST,
                    CatalogError::StoreConsistency(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    tracing::error!(error = %e, "Store consistency violation");
                }
                (status, e.to_string())
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// One captured exchange.
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub request: RequestDescriptor,
    pub response: ResponseDescriptor,
}

/// Outcome of a HAR upload. `entries - recorded - failed` entries were
/// skipped before reaching the store (unusable URL).
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct HarSummary {
    pub entries: usize,
    pub recorded: usize,
    pub created: usize,
    pub failed: usize,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse<'a> {
    pub pattern: String,
    pub data: &'a LeafData,
}

#[derive(Debug, Deserialize)]
pub struct ParameterizeRequest {
    pub position: usize,
    pub path: String,
    pub host: String,
}

#[derive(Debug, Serialize)]
pub struct ParameterizeResponse {
    pub pattern: String,
    pub merged: Vec<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn capture(
    State(state): State<AppState>,
    Json(body): Json<CaptureRequest>,
) -> ApiResult<(StatusCode, Json<InsertOutcome>)> {
    let CaptureRequest {
        mut request,
        mut response,
    } = body;
    request.host = normalize_host(&request.host);
    state.filter.sanitize_exchange(&mut request, &mut response);

    let outcome = state.store.lock().await.insert(&request, &response)?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

/// Insert every exchange. A failed insert is logged and counted; the
/// exchanges before and after it are still recorded.
pub fn ingest(store: &mut RouteStore, entries: usize, exchanges: &[(RequestDescriptor, ResponseDescriptor)]) -> HarSummary {
    let mut summary = HarSummary {
        entries,
        recorded: 0,
        created: 0,
        failed: 0,
    };
    for (request, response) in exchanges {
        match store.insert(request, response) {
            Ok(outcome) => {
                summary.recorded += 1;
                if outcome.created {
                    summary.created += 1;
                }
            }
            Err(e) => {
                tracing::warn!(host = %request.host, path = %request.path, error = %e, "Failed to record HAR entry");
                summary.failed += 1;
            }
        }
    }
    summary
}

pub async fn capture_har(State(state): State<AppState>, Json(har): Json<Har>) -> Json<HarSummary> {
    let exchanges = har.exchanges(&state.filter);
    let summary = ingest(&mut *state.store.lock().await, har.log.entries.len(), &exchanges);

    tracing::info!(
        entries = summary.entries,
        recorded = summary.recorded,
        created = summary.created,
        failed = summary.failed,
        "Ingested HAR log"
    );
    Json(summary)
}

pub async fn list_routes(State(state): State<AppState>) -> Json<BTreeMap<String, Vec<String>>> {
    let store = state.store.lock().await;
    let routes = store
        .hosts()
        .map(|host| (host.to_string(), store.patterns(host)))
        .collect();
    Json(routes)
}

pub async fn clear_routes(State(state): State<AppState>) -> StatusCode {
    state.store.lock().await.clear();
    StatusCode::NO_CONTENT
}

pub async fn lookup(
    State(state): State<AppState>,
    Path(host): Path<String>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<Response> {
    let host = normalize_host(&host);
    let store = state.store.lock().await;
    let Some(route) = store.lookup_route(&host, &query.path)? else {
        return Err(ApiError::NotFound(format!("no route on `{host}` matches `{}`", query.path)));
    };
    let response = Json(LookupResponse {
        pattern: route.pattern.canonical(),
        data: &route.data,
    })
    .into_response();
    Ok(response)
}

pub async fn parameterize(
    State(state): State<AppState>,
    Json(body): Json<ParameterizeRequest>,
) -> ApiResult<Json<ParameterizeResponse>> {
    let done = state
        .store
        .lock()
        .await
        .parameterize(body.position, &body.path, &normalize_host(&body.host))?;
    Ok(Json(ParameterizeResponse {
        pattern: done.pattern.canonical(),
        merged: done.merged,
    }))
}

pub async fn export_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.store.lock().await.export())
}

pub async fn import_snapshot(State(state): State<AppState>, Json(snapshot): Json<Snapshot>) -> ApiResult<StatusCode> {
    state.store.lock().await.import(snapshot)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_options(
    State(state): State<AppState>,
    Json(partial): Json<PartialStoreOptions>,
) -> Json<StoreOptions> {
    Json(state.store.lock().await.options(partial))
}

pub async fn openapi_document(State(state): State<AppState>, Path(host): Path<String>) -> ApiResult<Json<Value>> {
    let host = normalize_host(&host);
    let store = state.store.lock().await;
    openapi::build_document(&host, &store)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no routes recorded for `{host}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::segment::Pattern;
    use serde_json::json;

    fn exchange(path: &str) -> (RequestDescriptor, ResponseDescriptor) {
        (
            RequestDescriptor::new("GET", "api.test", path),
            ResponseDescriptor::json(200, json!({})),
        )
    }

    #[test]
    fn test_ingest_continues_past_failures() {
        let mut store = RouteStore::new();
        let router = store.router_mut("api.test");
        router.register(Pattern::parse("/a/:param1").unwrap(), LeafData::default());
        router.register(Pattern::parse("/:param0/b").unwrap(), LeafData::default());

        let summary = ingest(&mut store, 4, &[exchange("/a/b"), exchange("/c"), exchange("/c")]);
        assert_eq!(
            summary,
            HarSummary {
                entries: 4,
                recorded: 2,
                created: 1,
                failed: 1,
            }
        );
        assert!(store.patterns("api.test").contains(&"/c".to_string()));
    }

    #[test]
    fn test_store_errors_map_to_statuses() {
        let cases = [
            (CatalogError::InvalidParameterization("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (CatalogError::CorruptSnapshot("x".into()), StatusCode::BAD_REQUEST),
            (CatalogError::StoreConsistency("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
        assert_eq!(ApiError::NotFound("x".into()).into_response().status(), StatusCode::NOT_FOUND);
    }
}
