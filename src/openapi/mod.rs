//! OpenAPI export.
//!
//! # Data Flow
//! ```text
//! RouteStore (one host's router)
//!     → builder.rs (pattern → path item, method → operation)
//!     → serde_json::Value (OpenAPI 3.1 document)
//! ```
//!
//! # Design Decisions
//! - Read-only: building a document never touches the store
//! - Dynamic segments become required string path parameters
//! - Query parameters and response headers are always optional
//! - Observed `Authorization` schemes become HTTP security schemes

pub mod builder;

pub use builder::{build_document, build_from_routes, openapi_path, OPENAPI_VERSION};
