//! HTTP service subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID stamped and echoed)
//!     → admin::auth (bearer key on mutating methods)
//!     → handlers.rs (lock store, run one operation)
//!     → JSON response
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{build_router, open_store, AppState, CatalogServer};
