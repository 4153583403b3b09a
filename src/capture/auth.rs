//! HTTP authentication scheme detection.
//!
//! The credential itself is never kept; only the scheme named in an
//! `Authorization` header survives sanitization.

use serde::{Deserialize, Serialize};

use crate::capture::exchange::NameValue;

/// HTTP authentication schemes an API can be documented with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    Basic,
    Bearer,
    Digest,
}

impl AuthScheme {
    /// Scheme named by an `Authorization` header value (`Bearer abc...`).
    pub fn from_authorization(value: &str) -> Option<Self> {
        let scheme = value.trim_start().split_whitespace().next()?;
        match scheme.to_ascii_lowercase().as_str() {
            "basic" => Some(AuthScheme::Basic),
            "bearer" => Some(AuthScheme::Bearer),
            "digest" => Some(AuthScheme::Digest),
            _ => None,
        }
    }

    /// Scheme of the first recognizable `Authorization` header.
    pub fn detect(headers: &[NameValue]) -> Option<Self> {
        headers
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case("authorization"))
            .find_map(|h| Self::from_authorization(&h.value))
    }

    /// Lower-case scheme token as registered for HTTP auth.
    pub fn as_str(self) -> &'static str {
        match self {
            AuthScheme::Basic => "basic",
            AuthScheme::Bearer => "bearer",
            AuthScheme::Digest => "digest",
        }
    }

    /// Key under `components.securitySchemes`.
    pub fn component_name(self) -> &'static str {
        match self {
            AuthScheme::Basic => "basicAuth",
            AuthScheme::Bearer => "bearerAuth",
            AuthScheme::Digest => "digestAuth",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_authorization() {
        assert_eq!(AuthScheme::from_authorization("Bearer abc.def"), Some(AuthScheme::Bearer));
        assert_eq!(AuthScheme::from_authorization("basic dXNlcjpwdw=="), Some(AuthScheme::Basic));
        assert_eq!(
            AuthScheme::from_authorization("Digest username=\"a\", realm=\"b\""),
            Some(AuthScheme::Digest)
        );
        assert_eq!(AuthScheme::from_authorization("Token abc"), None);
        assert_eq!(AuthScheme::from_authorization(""), None);
    }

    #[test]
    fn test_detect_ignores_other_headers() {
        let headers = vec![
            NameValue::new("x-api-key", "Bearer nope"),
            NameValue::new("AUTHORIZATION", "Bearer yes"),
        ];
        assert_eq!(AuthScheme::detect(&headers), Some(AuthScheme::Bearer));
        assert_eq!(AuthScheme::detect(&headers[..1]), None);
    }
}
