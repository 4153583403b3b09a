//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, auth)
//! - Open the store, importing the persisted snapshot if any
//! - Serve until shutdown, then persist the store

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::require_api_key;
use crate::capture::HeaderFilter;
use crate::catalog::{PartialStoreOptions, RouteStore, Snapshot};
use crate::config::CatalogConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<RouteStore>>,
    pub filter: Arc<HeaderFilter>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(config: &CatalogConfig, store: RouteStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            filter: Arc::new(HeaderFilter::new(&config.capture)),
            api_key: config.admin.api_key.as_deref().map(Arc::from),
        }
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &CatalogConfig, state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/captures", post(handlers::capture))
        .route("/captures/har", post(handlers::capture_har))
        .route("/routes", get(handlers::list_routes).delete(handlers::clear_routes))
        .route("/routes/{host}/lookup", get(handlers::lookup))
        .route("/parameterize", post(handlers::parameterize))
        .route(
            "/snapshot",
            get(handlers::export_snapshot).put(handlers::import_snapshot),
        )
        .route("/options", patch(handlers::update_options))
        .route("/openapi/{host}", get(handlers::openapi_document))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.listener.max_body_size))
        .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}

/// Fresh store with the configured options, replaced by the persisted
/// snapshot when one can be read.
pub fn open_store(config: &CatalogConfig) -> RouteStore {
    let mut store = RouteStore::new();
    store.options(PartialStoreOptions {
        enable_more_info: Some(config.store.enable_more_info),
        ..PartialStoreOptions::default()
    });

    let Some(path) = config.persistence.snapshot_path.as_deref().map(Path::new) else {
        return store;
    };
    if !path.exists() {
        tracing::info!(path = %path.display(), "No snapshot yet, starting empty");
        return store;
    }

    match Snapshot::load_from_file(path) {
        Ok(snapshot) => {
            let routes = snapshot.route_count();
            match store.import(snapshot) {
                Ok(()) => tracing::info!(path = %path.display(), routes, "Restored catalog snapshot"),
                Err(e) => tracing::error!(path = %path.display(), error = %e, "Snapshot rejected, starting empty"),
            }
        }
        Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to read snapshot, starting empty"),
    }
    store
}

/// HTTP server for the route catalog.
pub struct CatalogServer {
    router: Router,
    state: AppState,
    config: CatalogConfig,
}

impl CatalogServer {
    pub fn new(config: CatalogConfig, store: RouteStore) -> Self {
        let state = AppState::new(&config, store);
        let router = build_router(&config, state.clone());
        Self { router, state, config }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        self.persist().await;
        Ok(())
    }

    /// Write the store to the snapshot file, if configured.
    pub async fn persist(&self) {
        let persistence = &self.config.persistence;
        let Some(path) = persistence.snapshot_path.as_deref() else {
            return;
        };
        if !persistence.save_on_shutdown {
            return;
        }
        let snapshot = self.state.store.lock().await.export();
        if let Err(e) = snapshot.save_to_file(Path::new(path)) {
            tracing::error!(path = %path, error = %e, "Failed to save catalog snapshot");
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
