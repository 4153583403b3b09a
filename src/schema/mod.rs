//! Schema accumulation.
//!
//! # Data Flow
//! ```text
//! sample value (request body, response body, headers, query)
//!     → accumulator.rs (infer a schema for the single value)
//!     → accumulator.rs (merge into the prior schema)
//!     → types.rs (Schema with a TypeSet per position)
//! ```
//!
//! # Design Decisions
//! - Kinds form a small closed set; merging is union, never replacement
//! - Merge is commutative so folding leaves is order-independent
//! - The accumulator sits behind a trait so the store can swap strategies

pub mod accumulator;
pub mod types;

pub use accumulator::{SchemaAccumulator, ShapeAccumulator};
pub use types::{Kind, Schema, TypeSet};
