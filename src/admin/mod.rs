//! Access control for the catalog service.
//!
//! # Design Decisions
//! - Reads are open; writes need the configured bearer key
//! - No key configured means no check (local capture sessions)

pub mod auth;

pub use auth::require_api_key;
