//! OpenAPI 3.1 document builder.

use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::capture::auth::AuthScheme;
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::leaf::{LeafData, MethodData};
use crate::catalog::store::RouteStore;
use crate::routing::segment::{Pattern, Segment};
use crate::schema::Schema;

pub const OPENAPI_VERSION: &str = "3.1.0";

/// Methods that never carry a request body in the document.
const BODYLESS_METHODS: [&str; 3] = ["get", "delete", "head"];

/// Render a pattern as an OpenAPI path (`/users/{param1}`).
pub fn openapi_path(pattern: &Pattern) -> String {
    if pattern.segments().is_empty() {
        return "/".to_string();
    }
    pattern
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Literal(value) => format!("/{value}"),
            Segment::Dynamic(name) => format!("/{{{name}}}"),
        })
        .collect()
}

/// Document for one host of a live store. `None` if the host has no routes.
pub fn build_document(host: &str, store: &RouteStore) -> Option<Value> {
    let router = store.router(host).filter(|r| !r.is_empty())?;
    Some(build(
        host,
        router.routes().map(|route| (&route.pattern, &route.data)),
    ))
}

/// Document for one host of an exported snapshot.
pub fn build_from_routes(host: &str, routes: &BTreeMap<String, LeafData>) -> CatalogResult<Value> {
    let parsed = routes
        .iter()
        .map(|(key, data)| {
            Pattern::parse(key)
                .map(|pattern| (pattern, data))
                .map_err(|e| CatalogError::CorruptSnapshot(e.to_string()))
        })
        .collect::<CatalogResult<Vec<_>>>()?;
    Ok(build(host, parsed.iter().map(|(p, d)| (p, *d))))
}

fn build<'a>(host: &str, routes: impl Iterator<Item = (&'a Pattern, &'a LeafData)>) -> Value {
    let mut paths = Map::new();
    let mut schemes = BTreeSet::new();
    for (pattern, data) in routes {
        paths.insert(openapi_path(pattern), path_item(pattern, data));
        schemes.extend(data.methods.values().flat_map(|m| m.security.iter().copied()));
    }

    let count = paths.len();
    let plural = if count == 1 { "" } else { "s" };
    let mut doc = json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": format!("{host} API"),
            "version": "1.0.0",
            "description": format!("Generated from captured traffic. Contains {count} endpoint{plural}."),
        },
        "servers": [{ "url": format!("https://{host}") }],
        "paths": paths,
    });
    if !schemes.is_empty() {
        doc["components"] = json!({ "securitySchemes": security_schemes(&schemes) });
    }
    doc
}

fn security_schemes(schemes: &BTreeSet<AuthScheme>) -> Map<String, Value> {
    schemes
        .iter()
        .map(|scheme| {
            (
                scheme.component_name().to_string(),
                json!({ "type": "http", "scheme": scheme.as_str() }),
            )
        })
        .collect()
}

fn path_item(pattern: &Pattern, data: &LeafData) -> Value {
    let mut item = Map::new();
    for (method, method_data) in &data.methods {
        let method = method.to_ascii_lowercase();
        let op = operation(pattern, &method, method_data);
        item.insert(method, op);
    }
    Value::Object(item)
}

fn operation(pattern: &Pattern, method: &str, data: &MethodData) -> Value {
    let mut parameters: Vec<Value> = pattern
        .param_names()
        .map(|name| {
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": { "type": "string" },
            })
        })
        .collect();
    parameters.extend(optional_parameters(data.query_parameters.as_ref(), "query"));
    parameters.extend(optional_parameters(data.request_headers.as_ref(), "header"));

    let mut op = Map::new();
    op.insert("parameters".into(), Value::Array(parameters));

    // Each scheme is an alternative requirement.
    if !data.security.is_empty() {
        let security: Vec<Value> = data
            .security
            .iter()
            .map(|scheme| {
                let mut requirement = Map::new();
                requirement.insert(scheme.component_name().to_string(), json!([]));
                Value::Object(requirement)
            })
            .collect();
        op.insert("security".into(), Value::Array(security));
    }

    if !BODYLESS_METHODS.contains(&method) && !data.request.is_empty() {
        let content: Map<String, Value> = data
            .request
            .iter()
            .map(|(ct, entry)| (ct.clone(), media_type(entry.body.as_ref(), entry.most_recent.as_ref())))
            .collect();
        op.insert("requestBody".into(), json!({ "content": content }));
    }

    let mut responses = Map::new();
    for (status, by_type) in &data.response {
        let content: Map<String, Value> = by_type
            .iter()
            .map(|(ct, entry)| (ct.clone(), media_type(entry.body.as_ref(), entry.most_recent.as_ref())))
            .collect();
        let headers: Map<String, Value> = by_type
            .values()
            .filter_map(|entry| entry.headers.as_ref()?.properties.as_ref())
            .flatten()
            .map(|(name, schema)| (name.clone(), json!({ "required": false, "schema": schema })))
            .collect();
        responses.insert(
            status.to_string(),
            json!({ "description": "", "content": content, "headers": headers }),
        );
    }
    op.insert("responses".into(), Value::Object(responses));

    Value::Object(op)
}

fn optional_parameters(schema: Option<&Schema>, location: &str) -> Vec<Value> {
    let Some(properties) = schema.and_then(|s| s.properties.as_ref()) else {
        return Vec::new();
    };
    properties
        .iter()
        .map(|(name, schema)| {
            json!({
                "name": name,
                "in": location,
                "required": false,
                "schema": schema,
            })
        })
        .collect()
}

fn media_type(schema: Option<&Schema>, example: Option<&Value>) -> Value {
    let mut media = Map::new();
    if let Some(schema) = schema {
        media.insert("schema".into(), json!(schema));
    }
    if let Some(example) = example {
        media.insert("example".into(), example.clone());
    }
    Value::Object(media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{NameValue, RequestDescriptor, ResponseDescriptor};

    fn store() -> RouteStore {
        let mut store = RouteStore::new();
        let mut request = RequestDescriptor::new("GET", "api.test", "/users/1");
        request.query.push(NameValue::new("page", "2"));
        let response = ResponseDescriptor::json(200, json!({ "id": 1 })).with_header("x-rate-limit", "10");
        store.insert(&request, &response).unwrap();
        store
            .insert(
                &RequestDescriptor::new("GET", "api.test", "/users/2"),
                &ResponseDescriptor::json(404, json!({ "error": "gone" })),
            )
            .unwrap();
        store
            .insert(
                &RequestDescriptor::new("POST", "api.test", "/users").with_body(json!({ "name": "a" })),
                &ResponseDescriptor::json(201, json!({ "id": 3 })),
            )
            .unwrap();
        store.parameterize(1, "/users/1", "api.test").unwrap();
        store
    }

    #[test]
    fn test_openapi_path() {
        assert_eq!(openapi_path(&Pattern::parse("/users/:param1/x").unwrap()), "/users/{param1}/x");
        assert_eq!(openapi_path(&Pattern::parse("/").unwrap()), "/");
    }

    #[test]
    fn test_document_root() {
        let doc = build_document("api.test", &store()).unwrap();
        assert_eq!(doc["openapi"], "3.1.0");
        assert_eq!(doc["servers"][0]["url"], "https://api.test");
        assert!(doc["info"]["description"].as_str().unwrap().ends_with("Contains 2 endpoints."));
        assert!(build_document("other.test", &store()).is_none());
    }

    #[test]
    fn test_parameters() {
        let doc = build_document("api.test", &store()).unwrap();
        let params = doc["paths"]["/users/{param1}"]["get"]["parameters"].as_array().unwrap().clone();
        assert_eq!(
            params[0],
            json!({ "name": "param1", "in": "path", "required": true, "schema": { "type": "string" } })
        );
        assert_eq!(params[1]["name"], "page");
        assert_eq!(params[1]["in"], "query");
        assert_eq!(params[1]["required"], false);
    }

    #[test]
    fn test_responses_and_bodies() {
        let doc = build_document("api.test", &store()).unwrap();
        let get = &doc["paths"]["/users/{param1}"]["get"];
        assert!(get.get("requestBody").is_none());
        assert_eq!(get["responses"]["200"]["content"]["application/json"]["schema"]["type"], "object");
        assert_eq!(get["responses"]["200"]["headers"]["x-rate-limit"]["required"], false);
        assert!(get["responses"]["404"].is_object());

        let post = &doc["paths"]["/users"]["post"];
        assert_eq!(
            post["requestBody"]["content"]["application/json"]["schema"]["properties"]["name"]["type"],
            "string"
        );
    }

    #[test]
    fn test_security_schemes() {
        let doc = build_document("api.test", &store()).unwrap();
        assert!(doc.get("components").is_none());
        assert!(doc["paths"]["/users/{param1}"]["get"].get("security").is_none());

        let mut store = store();
        let request = RequestDescriptor::new("GET", "api.test", "/users/9").with_header("Authorization", "Bearer abc");
        store.insert(&request, &ResponseDescriptor::json(200, json!({ "id": 9 }))).unwrap();
        let mut basic = RequestDescriptor::new("DELETE", "api.test", "/users");
        basic.auth = Some(AuthScheme::Basic);
        store.insert(&basic, &ResponseDescriptor::json(204, json!(null))).unwrap();

        let doc = build_document("api.test", &store).unwrap();
        assert_eq!(
            doc["components"]["securitySchemes"],
            json!({
                "basicAuth": { "type": "http", "scheme": "basic" },
                "bearerAuth": { "type": "http", "scheme": "bearer" },
            })
        );
        assert_eq!(doc["paths"]["/users/{param1}"]["get"]["security"], json!([{ "bearerAuth": [] }]));
        assert_eq!(doc["paths"]["/users"]["delete"]["security"], json!([{ "basicAuth": [] }]));
        assert!(doc["paths"]["/users"]["post"].get("security").is_none());
    }

    #[test]
    fn test_build_from_snapshot_routes() {
        let snapshot = store().export();
        let doc = build_from_routes("api.test", &snapshot.hosts["api.test"]).unwrap();
        assert_eq!(doc, build_document("api.test", &store()).unwrap());

        let bad = BTreeMap::from([("/:param3".to_string(), LeafData::default())]);
        assert!(build_from_routes("api.test", &bad).is_err());
    }
}
