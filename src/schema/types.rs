//! Type-union schema values.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Primitive or structural JSON kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

/// Set of kinds observed for one value position.
///
/// Serializes as a bare string when it holds a single kind and as an array
/// otherwise, in the declaration order of [`Kind`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSet(BTreeSet<Kind>);

impl TypeSet {
    pub fn of(kind: Kind) -> Self {
        Self(BTreeSet::from([kind]))
    }

    pub fn contains(&self, kind: Kind) -> bool {
        self.0.contains(&kind)
    }

    pub fn insert(&mut self, kind: Kind) -> bool {
        self.0.insert(kind)
    }

    pub fn union(&self, other: &TypeSet) -> TypeSet {
        TypeSet(self.0.union(&other.0).copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = Kind> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The kind names, in canonical order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Kind::as_str).collect()
    }
}

impl FromIterator<Kind> for TypeSet {
    fn from_iter<I: IntoIterator<Item = Kind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for TypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.len() == 1 {
            if let Some(kind) = self.0.iter().next() {
                return kind.serialize(serializer);
            }
        }
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(Kind),
            Many(Vec<Kind>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(kind) => TypeSet::of(kind),
            Repr::Many(kinds) => kinds.into_iter().collect(),
        })
    }
}

/// Structural description of every value merged so far.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "TypeSet::is_empty")]
    pub kind: TypeSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,

    /// Keys present in every object sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<BTreeSet<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
}

impl Schema {
    pub fn of(kind: Kind) -> Self {
        Self {
            kind: TypeSet::of(kind),
            ..Self::default()
        }
    }

    pub fn is(&self, kind: Kind) -> bool {
        self.kind.contains(kind)
    }

    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.as_ref()?.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_kind_serializes_as_string() {
        let schema = Schema::of(Kind::Integer);
        assert_eq!(serde_json::to_value(&schema).unwrap(), json!({ "type": "integer" }));
    }

    #[test]
    fn test_union_serializes_in_canonical_order() {
        let kinds: TypeSet = [Kind::String, Kind::Null, Kind::Integer].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&kinds).unwrap(),
            json!(["null", "integer", "string"])
        );
        assert_eq!(kinds.names(), vec!["null", "integer", "string"]);
    }

    #[test]
    fn test_deserialize_both_forms() {
        let one: TypeSet = serde_json::from_value(json!("boolean")).unwrap();
        assert_eq!(one, TypeSet::of(Kind::Boolean));

        let many: TypeSet = serde_json::from_value(json!(["string", "null", "string"])).unwrap();
        assert_eq!(many.len(), 2);
        assert!(many.contains(Kind::Null));
    }
}
