//! HAR (HTTP Archive) decoding.
//!
//! Only the fields the catalog needs are modelled; everything else in a
//! `.har` file is ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::capture::exchange::{
    normalize_content_type, CaptureError, NameValue, RequestDescriptor, ResponseDescriptor,
};
use crate::capture::headers::HeaderFilter;

/// Top-level HAR document.
#[derive(Debug, Clone, Deserialize)]
pub struct Har {
    pub log: HarLog,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

/// One recorded request/response pair.
#[derive(Debug, Clone, Deserialize)]
pub struct HarEntry {
    pub request: HarRequest,
    pub response: HarResponse,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarRequest {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<NameValue>,
    #[serde(default)]
    pub post_data: Option<HarContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: Vec<NameValue>,
    #[serde(default)]
    pub content: HarContent,
}

/// Request `postData` or response `content`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarContent {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl HarContent {
    /// The body as JSON, if it is plain text that parses.
    pub fn json(&self) -> Option<Value> {
        if self.encoding.is_some() {
            return None;
        }
        let text = self.text.as_deref()?.trim();
        if text.is_empty() {
            return None;
        }
        serde_json::from_str(text).ok()
    }
}

impl HarEntry {
    /// Sanitized descriptors for this entry.
    pub fn to_exchange(
        &self,
        filter: &HeaderFilter,
    ) -> Result<(RequestDescriptor, ResponseDescriptor), CaptureError> {
        let mut request = RequestDescriptor::from_url(&self.request.method, &self.request.url)?;
        request.headers = self.request.headers.clone();
        if let Some(post) = &self.request.post_data {
            request.content_type = Some(normalize_content_type(&post.mime_type));
            request.body = post.json();
        }

        let mut response = ResponseDescriptor {
            status: self.response.status,
            content_type: normalize_content_type(&self.response.content.mime_type),
            headers: self.response.headers.clone(),
            body: self.response.content.json(),
        };

        filter.sanitize_exchange(&mut request, &mut response);
        Ok((request, response))
    }
}

impl Har {
    /// Sanitized exchanges for every usable entry. Entries with unusable
    /// URLs are skipped.
    pub fn exchanges(&self, filter: &HeaderFilter) -> Vec<(RequestDescriptor, ResponseDescriptor)> {
        self.log
            .entries
            .iter()
            .filter_map(|entry| match entry.to_exchange(filter) {
                Ok(exchange) => Some(exchange),
                Err(e) => {
                    tracing::warn!(url = %entry.request.url, error = %e, "Skipping HAR entry");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Har {
        serde_json::from_value(json!({
            "log": {
                "version": "1.2",
                "entries": [
                    {
                        "startedDateTime": "2024-01-01T00:00:00Z",
                        "request": {
                            "method": "post",
                            "url": "https://test.com/users/1?expand=true",
                            "headers": [
                                { "name": "Content-Type", "value": "application/json" },
                                { "name": "X-Tenant", "value": "acme" },
                                { "name": "Cookie", "value": "session=1" }
                            ],
                            "postData": { "mimeType": "application/json", "text": "{\"name\":\"a\"}" }
                        },
                        "response": {
                            "status": 201,
                            "headers": [{ "name": "X-Rate-Limit", "value": "10" }],
                            "content": { "mimeType": "application/json; charset=utf-8", "text": "{\"id\":1}" }
                        }
                    },
                    {
                        "request": { "method": "GET", "url": "not a url" },
                        "response": { "status": 200 }
                    },
                    {
                        "request": { "method": "GET", "url": "https://test.com/logo.png" },
                        "response": {
                            "status": 200,
                            "content": { "mimeType": "image/png", "text": "iVBORw0KGgo=", "encoding": "base64" }
                        }
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_exchanges_skip_bad_urls() {
        let exchanges = sample().exchanges(&HeaderFilter::default());
        assert_eq!(exchanges.len(), 2);
    }

    #[test]
    fn test_entry_to_exchange() {
        let exchanges = sample().exchanges(&HeaderFilter::default());
        let (request, response) = &exchanges[0];

        assert_eq!(request.method, "POST");
        assert_eq!(request.host, "test.com");
        assert_eq!(request.path, "/users/1");
        assert_eq!(request.query, vec![NameValue::new("expand", "true")]);
        assert_eq!(request.headers, vec![NameValue::new("X-Tenant", "acme")]);
        assert_eq!(request.body, Some(json!({ "name": "a" })));

        assert_eq!(response.status, 201);
        assert_eq!(response.content_type, "application/json");
        assert_eq!(response.body, Some(json!({ "id": 1 })));
        assert_eq!(response.headers.len(), 1);
    }

    #[test]
    fn test_encoded_body_is_dropped() {
        let exchanges = sample().exchanges(&HeaderFilter::default());
        let (_, response) = &exchanges[1];
        assert_eq!(response.content_type, "image/png");
        assert!(response.body.is_none());
    }
}
