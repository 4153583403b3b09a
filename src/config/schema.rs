//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the catalog
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::catalog::options::StoreOptions;

/// Root configuration for the catalog service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Initial store options.
    pub store: StoreOptions,

    /// Header sanitization applied before samples reach the store.
    pub capture: CaptureConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Access control for mutating endpoints.
    pub admin: AdminConfig,

    /// Snapshot persistence across restarts.
    pub persistence: PersistenceConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8787").
    pub bind_address: String,

    /// Maximum request body size in bytes (HAR uploads can be large).
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8787".to_string(),
            max_body_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Header filtering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Drop credential headers (cookie, x-api-key, ...) from samples.
    pub strip_auth_headers: bool,

    /// Extra header names to ignore, on top of the built-in list.
    pub ignored_headers: Vec<String>,

    /// Extra header names to treat as credentials.
    pub auth_headers: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            strip_auth_headers: true,
            ignored_headers: Vec::new(),
            auth_headers: Vec::new(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Admin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer key required on mutating endpoints. None disables the check.
    pub api_key: Option<String>,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Snapshot file imported at startup if it exists.
    pub snapshot_path: Option<String>,

    /// Export to `snapshot_path` on shutdown.
    pub save_on_shutdown: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            save_on_shutdown: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: CatalogConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8787");
        assert!(config.capture.strip_auth_headers);
        assert!(!config.store.enable_more_info);
        assert!(config.admin.api_key.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config: CatalogConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "0.0.0.0:9000"

            [store]
            enable_more_info = true

            [capture]
            ignored_headers = ["x-trace"]

            [persistence]
            snapshot_path = "catalog.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(config.listener.max_body_size, 16 * 1024 * 1024);
        assert!(config.store.enable_more_info);
        assert_eq!(config.capture.ignored_headers, vec!["x-trace"]);
        assert!(config.capture.strip_auth_headers);
        assert_eq!(config.persistence.snapshot_path.as_deref(), Some("catalog.json"));
        assert!(config.persistence.save_on_shutdown);
    }
}
