//! Header sanitization.
//!
//! # Responsibilities
//! - Drop transport, caching, negotiation and CORS headers that say nothing
//!   about an API's contract
//! - Detect credential headers and strip them unless configured otherwise
//!
//! # Design Decisions
//! - Names are compared lower-cased
//! - Configured names extend the built-in lists, they never replace them

use std::collections::HashSet;

use crate::capture::exchange::{NameValue, RequestDescriptor, ResponseDescriptor};
use crate::config::schema::CaptureConfig;

/// Headers never recorded in a schema.
pub const IGNORED_HEADERS: &[&str] = &[
    ":authority", ":method", ":path", ":scheme", ":status",
    "a-im", "accept", "accept-additions", "accept-ch", "accept-ch-lifetime",
    "accept-charset", "accept-datetime", "accept-encoding", "accept-features",
    "accept-language", "accept-patch", "accept-post", "accept-ranges",
    "access-control-allow-credentials", "access-control-allow-headers",
    "access-control-allow-methods", "access-control-allow-origin",
    "access-control-expose-headers", "access-control-max-age",
    "access-control-request-headers", "access-control-request-method",
    "age", "allow", "alpn", "alt-svc", "alternate-protocol", "alternates",
    "amp-access-control-allow-source-origin", "apply-to-redirect-ref",
    "authentication-info", "authorization",
    "c-ext", "c-man", "c-opt", "c-pep", "c-pep-info", "cache-control", "ch",
    "connection", "content-base", "content-disposition", "content-dpr",
    "content-encoding", "content-id", "content-language", "content-length",
    "content-location", "content-md5", "content-range", "content-script-type",
    "content-security-policy", "content-security-policy-report-only",
    "content-style-type", "content-type", "content-version",
    "cross-origin-resource-policy",
    "dasl", "date", "dav", "default-style", "delta-base", "depth", "derived-from",
    "destination", "differential-id", "digest", "dnt", "dpr",
    "encryption", "encryption-key", "etag", "expect", "expect-ct", "expires", "ext",
    "forwarded", "from", "front-end-https", "getprofile", "host", "http2-settings",
    "if", "if-match", "if-modified-since", "if-none-match", "if-range",
    "if-schedule-tag-match", "if-unmodified-since", "im",
    "keep-alive", "key", "label", "last-event-id", "last-modified", "link",
    "link-template", "location", "lock-token",
    "man", "max-forwards", "md", "meter", "mime-version", "negotiate", "nice", "opt",
    "ordering-type", "origin", "origin-trial", "overwrite",
    "p3p", "pep", "pep-info", "pics-label", "poe", "poe-links", "position", "pragma",
    "prefer", "preference-applied", "profileobject", "protocol", "protocol-info",
    "protocol-query", "protocol-request", "proxy-authenticate",
    "proxy-authentication-info", "proxy-authorization", "proxy-connection",
    "proxy-features", "proxy-instruction", "public",
    "range", "redirect-ref", "referer", "referrer-policy", "report-to", "retry-after", "rw",
    "safe", "save-data", "schedule-reply", "schedule-tag", "sec-ch-ua",
    "sec-ch-ua-mobile", "sec-ch-ua-platform", "sec-fetch-dest", "sec-fetch-mode",
    "sec-fetch-site", "sec-fetch-user", "sec-websocket-accept",
    "sec-websocket-extensions", "sec-websocket-key", "sec-websocket-protocol",
    "sec-websocket-version", "security-scheme", "server", "server-timing",
    "set-cookie", "set-cookie2", "setprofile", "slug", "soapaction", "status-uri",
    "strict-transport-security", "sunset", "surrogate-capability", "surrogate-control",
    "tcn", "te", "timeout", "timing-allow-origin", "tk", "trailer", "transfer-encoding",
    "upgrade", "upgrade-insecure-requests", "uri", "user-agent",
    "variant-vary", "vary", "via", "want-digest", "warning", "www-authenticate",
    "x-att-deviceid", "x-csrf-token", "x-forwarded-for", "x-forwarded-host",
    "x-forwarded-proto", "x-frame-options", "x-frontend", "x-http-method-override",
    "x-powered-by", "x-request-id", "x-requested-with", "x-uidh", "x-wap-profile",
    "x-xss-protection",
];

/// Headers that carry credentials.
pub const AUTH_HEADERS: &[&str] = &[
    "access-key", "access-token", "api-key", "apikey", "auth-token",
    "authorization", "authorization-token", "cookie", "key", "secret", "token",
    "x-access-token", "x-api-key", "x-auth", "x-auth-token", "x-csrf-token",
    "x-secret",
];

/// Decides which captured headers reach the store.
#[derive(Debug, Clone)]
pub struct HeaderFilter {
    ignored: HashSet<String>,
    auth: HashSet<String>,
    strip_auth: bool,
}

impl HeaderFilter {
    /// Build from the capture configuration.
    pub fn new(config: &CaptureConfig) -> Self {
        let lower = |names: &[String]| -> Vec<String> {
            names.iter().map(|n| n.to_ascii_lowercase()).collect()
        };
        let ignored = IGNORED_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(lower(config.ignored_headers.as_slice()))
            .collect();
        let auth = AUTH_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(lower(config.auth_headers.as_slice()))
            .collect();

        Self {
            ignored,
            auth,
            strip_auth: config.strip_auth_headers,
        }
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(&name.to_ascii_lowercase())
    }

    /// Returns true if `name` carries credentials.
    pub fn is_auth_header(&self, name: &str) -> bool {
        self.auth.contains(&name.to_ascii_lowercase())
    }

    fn keep(&self, name: &str) -> bool {
        !self.is_ignored(name) && !(self.strip_auth && self.is_auth_header(name))
    }

    /// Headers that survive filtering, in their original order.
    pub fn sanitize(&self, headers: &[NameValue]) -> Vec<NameValue> {
        headers.iter().filter(|h| self.keep(&h.name)).cloned().collect()
    }

    /// Sanitize both sides of an exchange in place.
    pub fn sanitize_exchange(&self, request: &mut RequestDescriptor, response: &mut ResponseDescriptor) {
        request.auth = request.auth_scheme();
        let before = request.headers.len() + response.headers.len();
        request.headers = self.sanitize(&request.headers);
        response.headers = self.sanitize(&response.headers);
        let dropped = before - request.headers.len() - response.headers.len();
        if dropped > 0 {
            tracing::trace!(host = %request.host, path = %request.path, dropped, "Dropped captured headers");
        }
    }
}

impl Default for HeaderFilter {
    fn default() -> Self {
        Self::new(&CaptureConfig::default())
    }
}
