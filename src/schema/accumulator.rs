//! Shape inference and union merging.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::schema::types::{Kind, Schema};

/// Turns sample values into schemas and folds schemas together.
pub trait SchemaAccumulator: Send + Sync + std::fmt::Debug {
    /// Schema describing exactly one value.
    fn infer(&self, value: &Value) -> Schema;

    /// Union of two schemas. Must be commutative and associative.
    fn merge(&self, a: &Schema, b: &Schema) -> Schema;

    /// Widen `prior` so it also describes `value`.
    fn accumulate(&self, prior: Option<&Schema>, value: &Value) -> Schema {
        let sample = self.infer(value);
        match prior {
            Some(prior) => self.merge(prior, &sample),
            None => sample,
        }
    }

    /// Merge two optional schemas.
    fn merge_opt(&self, a: Option<&Schema>, b: Option<&Schema>) -> Option<Schema> {
        match (a, b) {
            (Some(a), Some(b)) => Some(self.merge(a, b)),
            (Some(s), None) | (None, Some(s)) => Some(s.clone()),
            (None, None) => None,
        }
    }
}

/// Default accumulator: one kind per JSON value, objects and arrays
/// described recursively.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeAccumulator;

impl ShapeAccumulator {
    fn infer_object(&self, map: &Map<String, Value>) -> Schema {
        let properties: BTreeMap<String, Schema> = map
            .iter()
            .map(|(key, value)| (key.clone(), self.infer(value)))
            .collect();
        Schema {
            required: Some(properties.keys().cloned().collect()),
            properties: Some(properties),
            ..Schema::of(Kind::Object)
        }
    }

    fn infer_array(&self, values: &[Value]) -> Schema {
        let items = values
            .iter()
            .map(|v| self.infer(v))
            .reduce(|a, b| self.merge(&a, &b));
        Schema {
            items: items.map(Box::new),
            ..Schema::of(Kind::Array)
        }
    }
}

impl SchemaAccumulator for ShapeAccumulator {
    fn infer(&self, value: &Value) -> Schema {
        match value {
            Value::Null => Schema::of(Kind::Null),
            Value::Bool(_) => Schema::of(Kind::Boolean),
            Value::Number(n) => {
                let integral = n.is_i64()
                    || n.is_u64()
                    || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0);
                Schema::of(if integral { Kind::Integer } else { Kind::Number })
            }
            Value::String(_) => Schema::of(Kind::String),
            Value::Array(values) => self.infer_array(values),
            Value::Object(map) => self.infer_object(map),
        }
    }

    fn merge(&self, a: &Schema, b: &Schema) -> Schema {
        let properties = match (&a.properties, &b.properties) {
            (Some(left), Some(right)) => {
                let mut merged = left.clone();
                for (key, schema) in right {
                    let entry = match merged.get(key) {
                        Some(existing) => self.merge(existing, schema),
                        None => schema.clone(),
                    };
                    merged.insert(key.clone(), entry);
                }
                Some(merged)
            }
            (Some(p), None) | (None, Some(p)) => Some(p.clone()),
            (None, None) => None,
        };

        // Only object samples constrain `required`.
        let required = match (a.is(Kind::Object), b.is(Kind::Object)) {
            (true, true) => match (&a.required, &b.required) {
                (Some(left), Some(right)) => Some(left.intersection(right).cloned().collect()),
                _ => None,
            },
            (true, false) => a.required.clone(),
            (false, true) => b.required.clone(),
            (false, false) => None,
        };

        let items = self
            .merge_opt(a.items.as_deref(), b.items.as_deref())
            .map(Box::new);

        Schema {
            kind: a.kind.union(&b.kind),
            properties,
            required,
            items,
        }
    }
}
