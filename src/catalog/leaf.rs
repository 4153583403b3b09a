//! Accumulated data for one route pattern.
//!
//! # Responsibilities
//! - Widen schemas per method, status and content type as samples arrive
//! - Keep the most recent example when examples are enabled
//! - Fold the data of several leaves into one
//!
//! # Design Decisions
//! - Schemas only ever widen; nothing is replaced
//! - Every write stamps a store-wide revision, used to pick the newest
//!   example when leaves are folded

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::capture::auth::AuthScheme;
use crate::capture::exchange::{pairs_to_object, RequestDescriptor, ResponseDescriptor};
use crate::schema::{Schema, SchemaAccumulator};

// Present-but-null examples stay `Some(Value::Null)`.
fn some_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// How a sample is folded into a leaf.
#[derive(Debug, Clone, Copy)]
pub struct SampleContext<'a> {
    pub accumulator: &'a dyn SchemaAccumulator,
    pub revision: u64,
    pub keep_examples: bool,
}

/// A request body schema for one content type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Schema>,
    #[serde(default, deserialize_with = "some_value", skip_serializing_if = "Option::is_none")]
    pub most_recent: Option<Value>,
    #[serde(default)]
    pub revision: u64,
}

/// A response schema for one status and content type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Schema>,
    #[serde(default, deserialize_with = "some_value", skip_serializing_if = "Option::is_none")]
    pub most_recent: Option<Value>,
    #[serde(default)]
    pub revision: u64,
}

/// Everything observed for one HTTP method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodData {
    /// Request body per content type.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub request: BTreeMap<String, BodyEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<Schema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<Schema>,

    /// Authentication schemes seen on requests.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub security: BTreeSet<AuthScheme>,

    /// Response per status code, then per content type.
    #[serde(default)]
    pub response: BTreeMap<u16, BTreeMap<String, ResponseEntry>>,
}

/// Data accumulated for one pattern, keyed by upper-case method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeafData {
    #[serde(default)]
    pub methods: BTreeMap<String, MethodData>,
}

impl BodyEntry {
    fn absorb(&mut self, other: BodyEntry, acc: &dyn SchemaAccumulator) {
        self.body = acc.merge_opt(self.body.as_ref(), other.body.as_ref());
        if other.revision > self.revision {
            if other.most_recent.is_some() {
                self.most_recent = other.most_recent;
            }
            self.revision = other.revision;
        }
    }
}

impl ResponseEntry {
    fn absorb(&mut self, other: ResponseEntry, acc: &dyn SchemaAccumulator) {
        self.body = acc.merge_opt(self.body.as_ref(), other.body.as_ref());
        self.headers = acc.merge_opt(self.headers.as_ref(), other.headers.as_ref());
        if other.revision > self.revision {
            if other.most_recent.is_some() {
                self.most_recent = other.most_recent;
            }
            self.revision = other.revision;
        }
    }
}

impl MethodData {
    /// Widen with one request/response pair.
    pub fn record(&mut self, request: &RequestDescriptor, response: &ResponseDescriptor, ctx: SampleContext<'_>) {
        let acc = ctx.accumulator;

        if let Some(body) = &request.body {
            let entry = self.request.entry(request.body_content_type()).or_default();
            entry.body = Some(acc.accumulate(entry.body.as_ref(), body));
            if ctx.keep_examples {
                entry.most_recent = Some(body.clone());
            }
            entry.revision = ctx.revision;
        }

        if !request.headers.is_empty() {
            let sample = pairs_to_object(&request.headers);
            self.request_headers = Some(acc.accumulate(self.request_headers.as_ref(), &sample));
        }

        if !request.query.is_empty() {
            let sample = pairs_to_object(&request.query);
            self.query_parameters = Some(acc.accumulate(self.query_parameters.as_ref(), &sample));
        }

        if let Some(scheme) = request.auth_scheme() {
            self.security.insert(scheme);
        }

        let entry = self
            .response
            .entry(response.status)
            .or_default()
            .entry(response.content_type.clone())
            .or_default();
        if let Some(body) = &response.body {
            entry.body = Some(acc.accumulate(entry.body.as_ref(), body));
            if ctx.keep_examples {
                entry.most_recent = Some(body.clone());
            }
        }
        if !response.headers.is_empty() {
            let sample = pairs_to_object(&response.headers);
            entry.headers = Some(acc.accumulate(entry.headers.as_ref(), &sample));
        }
        entry.revision = ctx.revision;
    }

    fn absorb(&mut self, other: MethodData, acc: &dyn SchemaAccumulator) {
        for (content_type, body) in other.request {
            match self.request.entry(content_type) {
                Entry::Occupied(mut slot) => slot.get_mut().absorb(body, acc),
                Entry::Vacant(slot) => {
                    slot.insert(body);
                }
            }
        }

        self.request_headers = acc.merge_opt(self.request_headers.as_ref(), other.request_headers.as_ref());
        self.query_parameters = acc.merge_opt(self.query_parameters.as_ref(), other.query_parameters.as_ref());
        self.security.extend(other.security);

        for (status, by_type) in other.response {
            let ours = self.response.entry(status).or_default();
            for (content_type, entry) in by_type {
                match ours.entry(content_type) {
                    Entry::Occupied(mut slot) => slot.get_mut().absorb(entry, acc),
                    Entry::Vacant(slot) => {
                        slot.insert(entry);
                    }
                }
            }
        }
    }

    fn max_revision(&self) -> u64 {
        let requests = self.request.values().map(|e| e.revision);
        let responses = self
            .response
            .values()
            .flat_map(|by_type| by_type.values().map(|e| e.revision));
        requests.chain(responses).max().unwrap_or(0)
    }
}

impl LeafData {
    /// Leaf seeded from a single sample.
    pub fn from_sample(request: &RequestDescriptor, response: &ResponseDescriptor, ctx: SampleContext<'_>) -> Self {
        let mut leaf = Self::default();
        leaf.record(request, response, ctx);
        leaf
    }

    /// Widen with one request/response pair.
    pub fn record(&mut self, request: &RequestDescriptor, response: &ResponseDescriptor, ctx: SampleContext<'_>) {
        self.methods
            .entry(request.method.to_ascii_uppercase())
            .or_default()
            .record(request, response, ctx);
    }

    /// Fold `other` into this leaf.
    pub fn absorb(&mut self, other: LeafData, acc: &dyn SchemaAccumulator) {
        for (method, data) in other.methods {
            match self.methods.entry(method) {
                Entry::Occupied(mut slot) => slot.get_mut().absorb(data, acc),
                Entry::Vacant(slot) => {
                    slot.insert(data);
                }
            }
        }
    }

    /// Highest revision stamped on any entry.
    pub fn max_revision(&self) -> u64 {
        self.methods.values().map(MethodData::max_revision).max().unwrap_or(0)
    }

    /// Response entry for a method, status and content type.
    pub fn response(&self, method: &str, status: u16, content_type: &str) -> Option<&ResponseEntry> {
        self.methods.get(method)?.response.get(&status)?.get(content_type)
    }

    /// Response body schema for a method, status and content type.
    pub fn response_body(&self, method: &str, status: u16, content_type: &str) -> Option<&Schema> {
        self.response(method, status, content_type)?.body.as_ref()
    }
}
