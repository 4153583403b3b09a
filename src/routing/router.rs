//! Per-host route table.
//!
//! # Responsibilities
//! - Store one entry per canonical pattern string
//! - Look up the single pattern matching a concrete path
//! - Register and remove patterns by exact identity
//!
//! # Design Decisions
//! - Flat map keyed by canonical string, no nested tree or shared prefixes
//! - O(n) scan per lookup (acceptable for per-host catalog sizes)
//! - Removal is by exact canonical string, never by prefix
//! - More than one match is reported, never resolved silently

use std::collections::BTreeMap;
use thiserror::Error;

use crate::routing::matcher::Matcher;
use crate::routing::segment::{split_path, Pattern};

/// Errors raised by the route table itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A concrete path matched several patterns.
    #[error("path `{path}` matches {} patterns: {}", .patterns.len(), .patterns.join(", "))]
    Ambiguous { path: String, patterns: Vec<String> },
}

/// A registered pattern and its data.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<T> {
    pub pattern: Pattern,
    pub data: T,
}

/// Route table for a single host.
#[derive(Debug, Clone, PartialEq)]
pub struct Router<T> {
    routes: BTreeMap<String, Route<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }
}

impl<T> Router<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the route matching a concrete path.
    pub fn lookup(&self, path: &str) -> Result<Option<&Route<T>>, RouterError> {
        let segments = split_path(path);
        let mut found: Option<&Route<T>> = None;
        let mut ambiguous = Vec::new();

        for (canonical, route) in &self.routes {
            if !route.pattern.matches(&segments) {
                continue;
            }
            match found {
                None => found = Some(route),
                Some(first) => {
                    if ambiguous.is_empty() {
                        ambiguous.push(first.pattern.canonical());
                    }
                    ambiguous.push(canonical.clone());
                }
            }
        }

        if !ambiguous.is_empty() {
            return Err(RouterError::Ambiguous {
                path: path.to_string(),
                patterns: ambiguous,
            });
        }
        Ok(found)
    }

    /// Mutable variant of [`Router::lookup`].
    pub fn lookup_mut(&mut self, path: &str) -> Result<Option<&mut Route<T>>, RouterError> {
        let key = self.lookup(path)?.map(|route| route.pattern.canonical());
        Ok(match key {
            Some(k) => self.routes.get_mut(&k),
            None => None,
        })
    }

    /// Exact lookup by canonical pattern string.
    pub fn get(&self, canonical: &str) -> Option<&Route<T>> {
        self.routes.get(canonical)
    }

    /// Insert or replace the entry for `pattern`.
    pub fn register(&mut self, pattern: Pattern, data: T) {
        self.routes.insert(pattern.canonical(), Route { pattern, data });
    }

    /// Remove the entry whose canonical string is exactly `canonical`.
    pub fn remove(&mut self, canonical: &str) -> Option<Route<T>> {
        self.routes.remove(canonical)
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route<T>> {
        self.routes.values()
    }

    /// Canonical strings in export order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First pair of registered patterns that overlap, if any.
    pub fn find_overlap(&self) -> Option<(&str, &str)> {
        let routes: Vec<_> = self.routes.iter().collect();
        for (i, (a_key, a)) in routes.iter().enumerate() {
            for (b_key, b) in &routes[i + 1..] {
                if a.pattern.overlaps(&b.pattern) {
                    return Some((a_key.as_str(), b_key.as_str()));
                }
            }
        }
        None
    }
}
