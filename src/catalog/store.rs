//! The route store.
//!
//! # Responsibilities
//! - Own one router per host and the store options
//! - Route every insert to an existing leaf or a new literal leaf
//! - Run parameterize, export, import and clear
//!
//! # Design Decisions
//! - Owned value, no process-wide state; several stores can coexist
//! - Single writer: methods take `&mut self`, callers add locking if shared
//! - `insert` never merges or templates anything on its own

use serde::Serialize;
use std::collections::BTreeMap;

use crate::capture::exchange::{RequestDescriptor, ResponseDescriptor};
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::leaf::{LeafData, SampleContext};
use crate::catalog::options::{PartialStoreOptions, StoreOptions};
use crate::catalog::parameterize::{self, Parameterized};
use crate::catalog::snapshot::Snapshot;
use crate::observability::metrics;
use crate::routing::segment::Pattern;
use crate::routing::{Route, Router};
use crate::schema::{SchemaAccumulator, ShapeAccumulator};

/// What an insert did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertOutcome {
    /// Canonical pattern of the leaf that took the sample.
    pub pattern: String,
    /// True if a new literal leaf was registered.
    pub created: bool,
}

/// Catalog of routes per host.
#[derive(Debug)]
pub struct RouteStore {
    hosts: BTreeMap<String, Router<LeafData>>,
    options: StoreOptions,
    accumulator: Box<dyn SchemaAccumulator>,
    revision: u64,
}

impl Default for RouteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteStore {
    /// Empty store using [`ShapeAccumulator`].
    pub fn new() -> Self {
        Self::with_accumulator(Box::new(ShapeAccumulator))
    }

    /// Empty store using a custom accumulator.
    pub fn with_accumulator(accumulator: Box<dyn SchemaAccumulator>) -> Self {
        Self {
            hosts: BTreeMap::new(),
            options: StoreOptions::default(),
            accumulator,
            revision: 0,
        }
    }

    /// Record one exchange.
    pub fn insert(
        &mut self,
        request: &RequestDescriptor,
        response: &ResponseDescriptor,
    ) -> CatalogResult<InsertOutcome> {
        let revision = self.revision + 1;
        let ctx = SampleContext {
            accumulator: self.accumulator.as_ref(),
            revision,
            keep_examples: self.options.enable_more_info,
        };

        // Nothing is created or stamped until the lookup has succeeded.
        let existing = match self.hosts.get_mut(&request.host) {
            Some(router) => router.lookup_mut(&request.path)?,
            None => None,
        };
        let outcome = match existing {
            Some(route) => {
                route.data.record(request, response, ctx);
                InsertOutcome {
                    pattern: route.pattern.canonical(),
                    created: false,
                }
            }
            None => {
                let router = self.hosts.entry(request.host.clone()).or_default();
                let pattern = Pattern::from_concrete(&request.path);
                let canonical = pattern.canonical();
                router.register(pattern, LeafData::from_sample(request, response, ctx));
                metrics::record_route_count(&request.host, router.len());
                InsertOutcome {
                    pattern: canonical,
                    created: true,
                }
            }
        };

        self.revision = revision;

        tracing::debug!(
            host = %request.host,
            method = %request.method,
            path = %request.path,
            pattern = %outcome.pattern,
            created = outcome.created,
            "Recorded exchange"
        );
        metrics::record_insert(outcome.created);
        Ok(outcome)
    }

    /// Data of the leaf matching a concrete path.
    pub fn lookup(&self, host: &str, path: &str) -> CatalogResult<Option<&LeafData>> {
        Ok(self.lookup_route(host, path)?.map(|route| &route.data))
    }

    /// The route (pattern and data) matching a concrete path.
    pub fn lookup_route(&self, host: &str, path: &str) -> CatalogResult<Option<&Route<LeafData>>> {
        match self.hosts.get(host) {
            Some(router) => Ok(router.lookup(path)?),
            None => Ok(None),
        }
    }

    /// Make segment `position` dynamic for the family of `example_path` on
    /// `host`, folding the family into one leaf.
    pub fn parameterize(
        &mut self,
        position: usize,
        example_path: &str,
        host: &str,
    ) -> CatalogResult<Parameterized> {
        let router = self.hosts.get_mut(host).ok_or_else(|| {
            CatalogError::InvalidParameterization(format!("unknown host `{host}`"))
        })?;

        let result = parameterize::parameterize(router, position, example_path, self.accumulator.as_ref());
        match &result {
            Ok(done) => {
                tracing::info!(
                    host = %host,
                    position,
                    example = %example_path,
                    pattern = %done.pattern,
                    merged = done.merged.len(),
                    "Parameterized route"
                );
                metrics::record_parameterize(true);
                metrics::record_route_count(host, router.len());
            }
            Err(e) => {
                tracing::warn!(host = %host, position, example = %example_path, error = %e, "Parameterize rejected");
                metrics::record_parameterize(false);
            }
        }
        result
    }

    /// Drop every host and reset options.
    pub fn clear(&mut self) {
        self.hosts.clear();
        self.options = StoreOptions::default();
        self.revision = 0;
        tracing::info!("Cleared route store");
    }

    /// Pure-data copy of the whole store.
    pub fn export(&self) -> Snapshot {
        let hosts = self
            .hosts
            .iter()
            .map(|(host, router)| {
                let routes = router
                    .routes()
                    .map(|route| (route.pattern.canonical(), route.data.clone()))
                    .collect();
                (host.clone(), routes)
            })
            .collect();
        Snapshot {
            hosts,
            config: self.options,
        }
    }

    /// Replace the whole store with a snapshot. On error nothing changes.
    pub fn import(&mut self, snapshot: Snapshot) -> CatalogResult<()> {
        let restored = snapshot.restore().inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected snapshot");
        })?;

        self.hosts = restored.hosts;
        self.options = restored.options;
        self.revision = restored.revision;

        for (host, router) in &self.hosts {
            metrics::record_route_count(host, router.len());
        }
        tracing::info!(hosts = self.hosts.len(), revision = self.revision, "Imported snapshot");
        Ok(())
    }

    /// Merge recognized option keys. Returns the resulting options.
    pub fn options(&mut self, partial: PartialStoreOptions) -> StoreOptions {
        let ignored = self.options.apply(partial);
        if !ignored.is_empty() {
            tracing::warn!(keys = ?ignored, "Ignoring unknown store options");
        }
        self.options
    }

    /// Current options.
    pub fn config(&self) -> StoreOptions {
        self.options
    }

    /// Router for a host.
    pub fn router(&self, host: &str) -> Option<&Router<LeafData>> {
        self.hosts.get(host)
    }

    /// Hosts with at least one route, in order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts
            .iter()
            .filter(|(_, router)| !router.is_empty())
            .map(|(host, _)| host.as_str())
    }

    /// Direct access to a host's router, bypassing every store invariant.
    #[cfg(test)]
    pub(crate) fn router_mut(&mut self, host: &str) -> &mut Router<LeafData> {
        self.hosts.entry(host.to_string()).or_default()
    }

    /// Canonical patterns registered for a host.
    pub fn patterns(&self, host: &str) -> Vec<String> {
        self.hosts
            .get(host)
            .map(|router| router.patterns().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HOST: &str = "test.com";

    fn insert(store: &mut RouteStore, path: &str, body: serde_json::Value) -> InsertOutcome {
        let request = RequestDescriptor::new("POST", HOST, path);
        store.insert(&request, &ResponseDescriptor::json(200, body)).unwrap()
    }

    #[test]
    fn test_insert_creates_then_updates() {
        let mut store = RouteStore::new();
        let first = insert(&mut store, "/1/2/a", json!({ "foo": 1 }));
        assert!(first.created);
        let second = insert(&mut store, "/1/2/a", json!({ "foo": "x" }));
        assert!(!second.created);
        assert_eq!(second.pattern, "/1/2/a");
        assert_eq!(store.patterns(HOST), vec!["/1/2/a"]);
    }

    #[test]
    fn test_insert_never_merges() {
        let mut store = RouteStore::new();
        insert(&mut store, "/1/2/a", json!({}));
        insert(&mut store, "/1/2/b", json!({}));
        insert(&mut store, "/1/2", json!({}));
        assert_eq!(store.patterns(HOST).len(), 3);
    }

    #[test]
    fn test_failed_insert_changes_nothing() {
        let mut store = RouteStore::new();
        insert(&mut store, "/x", json!({}));
        let router = store.router_mut(HOST);
        router.register(Pattern::parse("/a/:param1").unwrap(), LeafData::default());
        router.register(Pattern::parse("/:param0/b").unwrap(), LeafData::default());
        let before = store.export();

        let request = RequestDescriptor::new("POST", HOST, "/a/b");
        let err = store.insert(&request, &ResponseDescriptor::json(200, json!({}))).unwrap_err();
        assert!(matches!(err, CatalogError::StoreConsistency(_)));
        assert_eq!(store.revision, 1);
        assert_eq!(store.export(), before);

        insert(&mut store, "/y", json!({}));
        assert_eq!(store.revision, 2);
    }

    #[test]
    fn test_lookup_unknown_host() {
        let store = RouteStore::new();
        assert!(store.lookup("nope.com", "/").unwrap().is_none());
    }

    #[test]
    fn test_parameterize_unknown_host() {
        let mut store = RouteStore::new();
        let err = store.parameterize(0, "/a", "nope.com").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameterization(_)));
    }

    #[test]
    fn test_options_and_clear() {
        let mut store = RouteStore::new();
        let options = store.options(PartialStoreOptions {
            enable_more_info: Some(true),
            ..PartialStoreOptions::default()
        });
        assert!(options.enable_more_info);
        insert(&mut store, "/a", json!({ "x": 1 }));

        let entry = store.lookup(HOST, "/a").unwrap().unwrap().response("POST", 200, "application/json").unwrap();
        assert_eq!(entry.most_recent, Some(json!({ "x": 1 })));

        store.clear();
        assert!(!store.config().enable_more_info);
        assert_eq!(store.hosts().count(), 0);
    }

    #[test]
    fn test_import_resumes_revision() {
        let mut store = RouteStore::new();
        insert(&mut store, "/a", json!(1));
        insert(&mut store, "/b", json!(2));
        let snapshot = store.export();

        let mut other = RouteStore::new();
        other.import(snapshot).unwrap();
        assert_eq!(other.revision, 2);
    }
}
