//! Catalog error definitions.

use thiserror::Error;

use crate::routing::RouterError;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Position out of range, or the example path/host does not resolve.
    #[error("invalid parameterization: {0}")]
    InvalidParameterization(String),

    /// A snapshot pattern could not be parsed or patterns overlap.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// A concrete path matched more than one pattern.
    #[error("store consistency violation: {0}")]
    StoreConsistency(String),
}

impl From<RouterError> for CatalogError {
    fn from(err: RouterError) -> Self {
        CatalogError::StoreConsistency(err.to_string())
    }
}

/// Result type for store operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::InvalidParameterization("position 4 out of range".into());
        assert_eq!(err.to_string(), "invalid parameterization: position 4 out of range");

        let err: CatalogError = RouterError::Ambiguous {
            path: "/1/2/a".into(),
            patterns: vec!["/1/:param1/a".into(), "/1/2/:param2".into()],
        }
        .into();
        assert!(matches!(err, CatalogError::StoreConsistency(_)));
        assert!(err.to_string().contains("/1/2/a"));
    }
}
