//! Size summaries over a catalog snapshot.

use super::Catalog;
use crate::entry::Provenance;
use serde::Serialize;

/// Summary counts for a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub categories: usize,
    pub manifest_entries: usize,
    pub path_entries: usize,
    /// Non-empty categories, largest first; equal sizes keep taxonomy order.
    pub ranked: Vec<(String, usize)>,
}

impl CatalogStats {
    pub fn top(&self, n: usize) -> &[(String, usize)] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}

impl Catalog {
    pub fn stats(&self) -> CatalogStats {
        let manifest_entries = self
            .all()
            .iter()
            .filter(|entry| entry.provenance == Provenance::Manifest)
            .count();
        let mut ranked: Vec<(String, usize)> = self
            .non_empty_categories()
            .map(|cat| (cat.name.clone(), cat.entries.len()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        CatalogStats {
            total: self.len(),
            categories: ranked.len(),
            manifest_entries,
            path_entries: self.len() - manifest_entries,
            ranked,
        }
    }
}
