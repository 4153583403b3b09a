//! Route catalog library.
//!
//! Learns a per-host catalog of templated routes from captured HTTP
//! exchanges and exports it as snapshots or OpenAPI documents.

pub mod admin;
pub mod capture;
pub mod catalog;
pub mod config;
pub mod http;
pub mod observability;
pub mod openapi;
pub mod routing;
pub mod schema;

pub use catalog::{CatalogError, CatalogResult, RouteStore, Snapshot, StoreOptions};
pub use config::schema::CatalogConfig;
pub use http::CatalogServer;
