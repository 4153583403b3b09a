//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Store and service produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (host, pattern, position) on every store event
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
