//! Traffic capture subsystem.
//!
//! # Data Flow
//! ```text
//! Raw capture (HAR entry or JSON request/response pair)
//!     → har.rs (decode, parse URL, keep JSON bodies)
//!     → auth.rs (note the Authorization scheme)
//!     → headers.rs (drop ignored and credential headers)
//!     → exchange.rs (RequestDescriptor + ResponseDescriptor)
//!     → RouteStore::insert
//! ```
//!
//! # Design Decisions
//! - Sanitization happens before the store; the store trusts its input
//! - Non-JSON bodies are kept out of schemas rather than guessed at

pub mod auth;
pub mod exchange;
pub mod har;
pub mod headers;

pub use auth::AuthScheme;
pub use exchange::{normalize_host, CaptureError, NameValue, RequestDescriptor, ResponseDescriptor};
pub use har::{Har, HarEntry};
pub use headers::HeaderFilter;
