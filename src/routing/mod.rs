//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Concrete path (e.g. /users/42)
//!     → segment.rs (split into segments)
//!     → router.rs (scan the host's patterns)
//!     → matcher.rs (arity + per-segment literal/wildcard test)
//!     → Return: the single matching Route or None
//!
//! Pattern strings (snapshots, parameterize targets):
//!     "/users/:param1"
//!     → segment.rs (strict parse, :param<N> must sit at position N)
//!     → Pattern
//! ```
//!
//! # Design Decisions
//! - Router is generic over the data stored per pattern
//! - Deterministic: patterns kept in canonical-string order
//! - At most one pattern may match a concrete path; violations surface as errors

pub mod matcher;
pub mod router;
pub mod segment;

pub use matcher::Matcher;
pub use router::{Route, Router, RouterError};
pub use segment::{Pattern, Segment, SegmentError};
