//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Honour `RUST_LOG`, falling back to the configured level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via config and environment

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive when neither `RUST_LOG` nor config say otherwise.
pub const DEFAULT_DIRECTIVE: &str = "route_catalog=info,tower_http=info";

/// Directive for a bare level such as `debug`.
pub fn directive_for(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return DEFAULT_DIRECTIVE.to_string();
    }
    format!("route_catalog={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| directive_for(level).into());
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
    if let Err(e) = result {
        eprintln!("Logging already initialized: {e}");
    }
}
