//! Recognized store options.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Store-wide options, exported and imported with the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreOptions {
    /// Keep the most recent example payload for every schema.
    #[serde(alias = "enable_more_info")]
    pub enable_more_info: bool,
}

/// Partial update for [`StoreOptions`]. Unrecognized keys are collected so
/// the caller can report them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialStoreOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_more_info: Option<bool>,

    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

impl StoreOptions {
    /// Merge recognized keys. Returns the names of ignored keys.
    pub fn apply(&mut self, partial: PartialStoreOptions) -> Vec<String> {
        if let Some(enable) = partial.enable_more_info {
            self.enable_more_info = enable;
        }
        partial.unknown.into_keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_recognized_key() {
        let mut options = StoreOptions::default();
        let partial: PartialStoreOptions =
            serde_json::from_value(json!({ "enableMoreInfo": true })).unwrap();
        assert!(options.apply(partial).is_empty());
        assert!(options.enable_more_info);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut options = StoreOptions { enable_more_info: true };
        let partial: PartialStoreOptions =
            serde_json::from_value(json!({ "colour": "blue", "enableMoreInfo": null })).unwrap();
        assert_eq!(options.apply(partial), vec!["colour".to_string()]);
        assert!(options.enable_more_info);
    }

    #[test]
    fn test_serialized_form() {
        let options = StoreOptions { enable_more_info: true };
        assert_eq!(serde_json::to_value(options).unwrap(), json!({ "enableMoreInfo": true }));
    }
}
