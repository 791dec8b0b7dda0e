// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::{CatalogEntry, Error, Result, SearchMatch, Version, remote::ModSearch};

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "Version")]
    version: Version,
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "xxHash", default)]
    xx_hash: Vec<String>,
    #[serde(rename = "GameBananaId", default)]
    gamebanana_id: u64,
    #[serde(rename = "LastUpdate", default)]
    last_update: i64,
}

impl RawEntry {
    /// `None` when the entry publishes no content hash to compare against.
    fn into_entry(self, name: String) -> Option<CatalogEntry> {
        let content_hash = self
            .xx_hash
            .into_iter()
            .next()
            .filter(|hash| !hash.trim().is_empty())?
            .to_lowercase();

        Some(CatalogEntry {
            name,
            version: self.version,
            url: self.url,
            content_hash,
            catalog_id: self.gamebanana_id,
            last_update: self.last_update,
        })
    }
}

/// read-only snapshot of the remote mod catalog, keyed by mod name.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: BTreeMap<String, CatalogEntry>,
}

impl CatalogIndex {
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.name.clone(), e)).collect(),
        }
    }

    /// parses the everest update database.
    ///
    /// entries that do not match the expected shape are skipped rather than
    /// failing the whole catalog.
    pub fn parse(yaml: &str) -> Result<Self> {
        let raw: BTreeMap<String, serde_yaml_ng::Value> =
            serde_yaml_ng::from_str(yaml).map_err(|e| Error::catalog_parse(e.to_string()))?;

        let mut entries = BTreeMap::new();
        for (name, value) in raw {
            match serde_yaml_ng::from_value::<RawEntry>(value) {
                Ok(raw) => match raw.into_entry(name.clone()) {
                    Some(entry) => {
                        entries.insert(name, entry);
                    }
                    None => log::debug!(target: "catalog", "skipping entry {name}: no xxHash"),
                },
                Err(e) => log::debug!(target: "catalog", "skipping entry {name}: {e}"),
            }
        }

        log::debug!(target: "catalog", "loaded {} entries", entries.len());
        Ok(Self { entries })
    }

    pub fn lookup(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// every entry published under `catalog_id`. renamed mods share an id.
    pub fn find_by_id(&self, catalog_id: u64) -> Vec<&CatalogEntry> {
        self.entries
            .values()
            .filter(|e| e.catalog_id == catalog_id)
            .collect()
    }

    /// runs `term` through the search service and maps each hit back onto the catalog.
    pub fn search_matches(&self, term: &str, search: &dyn ModSearch) -> Result<Vec<SearchMatch>> {
        let hits = search.search(term)?;

        Ok(hits
            .into_iter()
            .map(|hit| {
                let names: Vec<String> = self
                    .find_by_id(hit.item_id)
                    .into_iter()
                    .map(|e| e.name.clone())
                    .collect();
                if names.is_empty() {
                    log::debug!(target: "catalog", "search hit {} not in catalog", hit.item_id);
                }
                SearchMatch {
                    catalog_id: hit.item_id,
                    names,
                }
            })
            .collect())
    }

    /// entries matching `term`, in search-rank order without duplicates.
    pub fn search(&self, term: &str, search: &dyn ModSearch) -> Result<Vec<&CatalogEntry>> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for found in self.search_matches(term, search)? {
            for name in found.names {
                if seen.insert(name.clone())
                    && let Some(entry) = self.entries.get(&name)
                {
                    results.push(entry);
                }
            }
        }

        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRemote, entry};

    const SAMPLE: &str = r#"
CollabUtils2:
  GameBananaType: Tool
  Version: 1.8.11
  LastUpdate: 1690000000
  Size: 1200000
  GameBananaId: 7000
  GameBananaFileId: 123
  xxHash:
  - 0A1B2C3D4E5F6071
  URL: https://gamebanana.com/mmdl/123
BrokenEntry:
  Version: not a version
  URL: https://example.invalid
SpringCollab2020:
  Version: 1.0
  LastUpdate: 1600000000
  GameBananaId: 8000
  xxHash: [ffeeddccbbaa9988]
  URL: https://gamebanana.com/mmdl/456
NoHash:
  Version: 2.0.0
  GameBananaId: 9000
  URL: https://gamebanana.com/mmdl/789
EmptyHash:
  Version: 2.0.0
  GameBananaId: 9001
  xxHash: []
  URL: https://gamebanana.com/mmdl/790
"#;

    #[test]
    fn test_parse_everest_update_database() {
        let catalog = CatalogIndex::parse(SAMPLE).unwrap();

        assert_eq!(catalog.len(), 2);
        let entry = catalog.lookup("CollabUtils2").unwrap();
        assert_eq!(entry.version, Version::new(1, 8, 11));
        assert_eq!(entry.content_hash, "0a1b2c3d4e5f6071");
        assert_eq!(entry.catalog_id, 7000);
        assert_eq!(entry.last_update, 1690000000);
        assert_eq!(entry.url, "https://gamebanana.com/mmdl/123");
        assert!(catalog.lookup("BrokenEntry").is_none());
    }

    #[test]
    fn test_parse_skips_entries_without_hash() {
        let catalog = CatalogIndex::parse(SAMPLE).unwrap();

        assert!(!catalog.contains("NoHash"));
        assert!(!catalog.contains("EmptyHash"));
        assert!(catalog.iter().all(|e| !e.content_hash.is_empty()));
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        assert!(matches!(
            CatalogIndex::parse("- just\n- a list\n"),
            Err(Error::CatalogParse(_))
        ));
    }

    #[test]
    fn test_find_by_id_returns_every_name_sharing_an_id() {
        let catalog = CatalogIndex::from_entries([
            entry("OldName", 42, 100),
            entry("NewName", 42, 200),
            entry("Unrelated", 7, 300),
        ]);

        let names: Vec<&str> = catalog
            .find_by_id(42)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["NewName", "OldName"]);
        assert!(catalog.find_by_id(999).is_empty());
    }

    #[test]
    fn test_search_reresolves_hits_by_id() {
        let catalog = CatalogIndex::from_entries([
            entry("A", 1, 100),
            entry("B", 2, 100),
            entry("B-Legacy", 2, 50),
        ]);
        let remote = FakeRemote::new().with_search("helper", &[2, 99, 1, 2]);

        let matches = catalog.search_matches("helper", &remote).unwrap();
        assert_eq!(matches.len(), 4);
        assert_eq!(matches[1].catalog_id, 99);
        assert!(matches[1].names.is_empty());

        let names: Vec<&str> = catalog
            .search("helper", &remote)
            .unwrap()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "B-Legacy", "A"]);
    }
}
