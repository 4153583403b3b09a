//! Route catalog subsystem.
//!
//! # Data Flow
//! ```text
//! insert(request, response)
//!     → store.rs (pick the host's router)
//!     → routing (find the matching pattern, if any)
//!     → leaf.rs (widen the matching leaf, or seed a new literal leaf)
//!
//! parameterize(position, example, host)
//!     → parameterize.rs (resolve, collect same-arity siblings, fold)
//!     → router: remove folded patterns, register the templated one
//!
//! export() / import(snapshot)
//!     → snapshot.rs (pure data ↔ validated routers)
//! ```
//!
//! # Design Decisions
//! - Canonical pattern strings are the single source of truth for structure
//! - Failed operations leave the store untouched
//! - Options travel with snapshots

pub mod error;
pub mod leaf;
pub mod options;
pub mod parameterize;
pub mod snapshot;
pub mod store;

pub use error::{CatalogError, CatalogResult};
pub use leaf::{BodyEntry, LeafData, MethodData, ResponseEntry};
pub use options::{PartialStoreOptions, StoreOptions};
pub use parameterize::Parameterized;
pub use snapshot::Snapshot;
pub use store::{InsertOutcome, RouteStore};
