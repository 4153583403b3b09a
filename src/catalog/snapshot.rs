//! Catalog snapshots and persistence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::leaf::LeafData;
use crate::catalog::options::StoreOptions;
use crate::routing::segment::Pattern;
use crate::routing::Router;

/// Pure-data copy of a store: every host's patterns with their data, plus
/// the store options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub hosts: BTreeMap<String, BTreeMap<String, LeafData>>,
    #[serde(default)]
    pub config: StoreOptions,
}

/// Routers rebuilt from a validated snapshot.
#[derive(Debug)]
pub(crate) struct Restored {
    pub hosts: BTreeMap<String, Router<LeafData>>,
    pub options: StoreOptions,
    pub revision: u64,
}

impl Snapshot {
    /// Total number of patterns across hosts.
    pub fn route_count(&self) -> usize {
        self.hosts.values().map(BTreeMap::len).sum()
    }

    /// Re-parse every pattern and rebuild the routers. Fails on the first
    /// malformed or overlapping pattern.
    pub(crate) fn restore(self) -> CatalogResult<Restored> {
        let mut hosts = BTreeMap::new();
        let mut revision = 0;

        for (host, patterns) in self.hosts {
            let mut router = Router::new();
            for (key, data) in patterns {
                let pattern = Pattern::parse(&key)
                    .map_err(|e| CatalogError::CorruptSnapshot(format!("host `{host}`: {e}")))?;
                if pattern.canonical() != key {
                    return Err(CatalogError::CorruptSnapshot(format!(
                        "host `{host}`: `{key}` is not in canonical form"
                    )));
                }
                revision = revision.max(data.max_revision());
                router.register(pattern, data);
            }

            if let Some((a, b)) = router.find_overlap() {
                return Err(CatalogError::CorruptSnapshot(format!(
                    "host `{host}`: patterns `{a}` and `{b}` overlap"
                )));
            }
            hosts.insert(host, router);
        }

        Ok(Restored {
            hosts,
            options: self.config,
            revision,
        })
    }

    /// Load from a JSON file.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let snapshot = serde_json::from_reader(reader)?;
        Ok(snapshot)
    }

    /// Save as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        tracing::info!(path = %path.display(), routes = self.route_count(), "Saved catalog snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(patterns: &[&str]) -> Snapshot {
        let routes = patterns
            .iter()
            .map(|p| (p.to_string(), LeafData::default()))
            .collect();
        Snapshot {
            hosts: BTreeMap::from([("test.com".to_string(), routes)]),
            config: StoreOptions::default(),
        }
    }

    #[test]
    fn test_restore_valid() {
        let restored = snapshot(&["/1/:param1/:param2", "/staticPath/2/3/4/5", "/"]).restore().unwrap();
        let router = &restored.hosts["test.com"];
        assert_eq!(router.len(), 3);
        assert!(router.lookup("/1/x/y").unwrap().is_some());
    }

    #[test]
    fn test_restore_rejects_malformed() {
        for bad in ["no/slash", "/1/:param2", "/:param1"] {
            let err = snapshot(&[bad]).restore().unwrap_err();
            assert!(matches!(err, CatalogError::CorruptSnapshot(_)), "{bad}");
        }
    }

    #[test]
    fn test_restore_rejects_overlap() {
        let err = snapshot(&["/1/:param1/a", "/1/2/:param2"]).restore().unwrap_err();
        assert!(err.to_string().contains("overlap"));
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(snapshot(&["/a"])).unwrap();
        assert_eq!(
            value,
            json!({
                "hosts": { "test.com": { "/a": { "methods": {} } } },
                "config": { "enableMoreInfo": false }
            })
        );
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("route-catalog-{}.json", std::process::id()));
        let original = snapshot(&["/users/:param1"]);
        original.save_to_file(&path).unwrap();
        let loaded = Snapshot::load_from_file(&path).unwrap();
        assert_eq!(loaded, original);
        std::fs::remove_file(&path).unwrap_or_default();
    }
}
