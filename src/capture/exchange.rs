//! Request and response descriptors handed to the store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::capture::auth::AuthScheme;

/// Content type assumed when a sample carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Errors raised while building descriptors from raw captures.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL `{0}` has no host")]
    MissingHost(String),
}

/// A header or query pair as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Fold pairs into a JSON object of strings. Later duplicates win.
pub fn pairs_to_object(pairs: &[NameValue]) -> Value {
    let map: Map<String, Value> = pairs
        .iter()
        .map(|p| (p.name.clone(), Value::String(p.value.clone())))
        .collect();
    Value::Object(map)
}

/// `application/JSON; charset=utf-8` → `application/json`.
pub fn normalize_content_type(raw: &str) -> String {
    let essence = raw.split(';').next().unwrap_or_default().trim();
    if essence.is_empty() {
        DEFAULT_CONTENT_TYPE.to_string()
    } else {
        essence.to_ascii_lowercase()
    }
}

/// Normalized description of a captured request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub host: String,
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub headers: Vec<NameValue>,
    #[serde(default)]
    pub query: Vec<NameValue>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub body: Option<Value>,
    /// Authentication scheme seen on the request, kept after credential
    /// headers are stripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthScheme>,
}

/// Host names are case-insensitive; the catalog keys them lower-cased.
pub fn normalize_host(host: &str) -> String {
    host.trim().to_ascii_lowercase()
}

impl RequestDescriptor {
    pub fn new(method: &str, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: normalize_host(&host.into()),
            path: path.into(),
            method: method.to_ascii_uppercase(),
            headers: Vec::new(),
            query: Vec::new(),
            content_type: None,
            body: None,
            auth: None,
        }
    }

    /// Build from an absolute URL. The host is lower-cased and the query
    /// string decoded into pairs.
    pub fn from_url(method: &str, url: &str) -> Result<Self, CaptureError> {
        let parsed = Url::parse(url).map_err(|source| CaptureError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let host = parsed
            .host_str()
            .ok_or_else(|| CaptureError::MissingHost(url.to_string()))?;

        let mut request = Self::new(method, host, parsed.path());
        request.query = parsed
            .query_pairs()
            .map(|(name, value)| NameValue::new(name, value))
            .collect();
        Ok(request)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push(NameValue::new(name, value));
        self
    }

    /// Recorded scheme, or the one named by an `Authorization` header.
    pub fn auth_scheme(&self) -> Option<AuthScheme> {
        self.auth.or_else(|| AuthScheme::detect(&self.headers))
    }

    /// Content type of the body, normalized.
    pub fn body_content_type(&self) -> String {
        self.content_type
            .as_deref()
            .map(normalize_content_type)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
    }
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// Normalized description of the response paired with a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDescriptor {
    pub status: u16,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub headers: Vec<NameValue>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl ResponseDescriptor {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push(NameValue::new(name, value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_url() {
        let req = RequestDescriptor::from_url("post", "https://API.Test.com/1/2/a?x=1&y=hello%20world").unwrap();
        assert_eq!(req.host, "api.test.com");
        assert_eq!(req.path, "/1/2/a");
        assert_eq!(req.method, "POST");
        assert_eq!(
            req.query,
            vec![NameValue::new("x", "1"), NameValue::new("y", "hello world")]
        );
    }

    #[test]
    fn test_host_lowercased() {
        let req = RequestDescriptor::new("get", " Test.COM", "/a");
        assert_eq!(req.host, "test.com");

        let mut req = req.with_header("Authorization", "Bearer t");
        assert_eq!(req.auth_scheme(), Some(AuthScheme::Bearer));
        req.headers.clear();
        assert_eq!(req.auth_scheme(), None);
    }

    #[test]
    fn test_from_url_rejects_relative() {
        assert!(matches!(
            RequestDescriptor::from_url("GET", "/just/a/path"),
            Err(CaptureError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_pairs_to_object() {
        let pairs = vec![NameValue::new("a", "1"), NameValue::new("a", "2"), NameValue::new("b", "x")];
        assert_eq!(pairs_to_object(&pairs), json!({ "a": "2", "b": "x" }));
    }

    #[test]
    fn test_normalize_content_type() {
        assert_eq!(normalize_content_type("Application/JSON; charset=utf-8"), "application/json");
        assert_eq!(normalize_content_type(""), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_response_defaults() {
        let res: ResponseDescriptor = serde_json::from_value(json!({ "status": 204 })).unwrap();
        assert_eq!(res.content_type, DEFAULT_CONTENT_TYPE);
        assert!(res.body.is_none());
    }
}
