//! Immutable, categorized view of one scan.
//!
//! A `Catalog` is built once from categorized entries and never changes.
//! Each category's sequence is sorted case-insensitively by name; equal keys
//! keep merge order, and the merge order itself is name-ordered, so two
//! builds from the same input are identical. The `All` view is kept as its
//! own sorted sequence rather than re-derived per query.

use crate::entry::AppEntry;
use crate::taxonomy::{ALL_SCOPE, OTHER_CATEGORY, Taxonomy};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntries {
    pub name: String,
    pub entries: Vec<AppEntry>,
}

/// One row of [`Catalog::list_categories`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<CategoryEntries>,
    all: Vec<AppEntry>,
    by_name: BTreeMap<String, usize>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Partition categorized entries into taxonomy order and sort them.
    ///
    /// `entries` must already carry unique names (the merger guarantees it);
    /// an entry whose category is not part of `taxonomy` is filed as `Other`.
    pub fn build(entries: Vec<AppEntry>, taxonomy: &Taxonomy) -> Self {
        let mut categories: Vec<CategoryEntries> = taxonomy
            .category_names()
            .map(|name| CategoryEntries {
                name: name.to_string(),
                entries: Vec::new(),
            })
            .collect();
        let slot_of: BTreeMap<String, usize> = categories
            .iter()
            .enumerate()
            .map(|(idx, cat)| (cat.name.clone(), idx))
            .collect();
        let other_slot = categories.len() - 1;

        let mut all = Vec::with_capacity(entries.len());
        for mut entry in entries {
            let slot = match slot_of.get(&entry.category) {
                Some(slot) => *slot,
                None => {
                    entry.category = OTHER_CATEGORY.to_string();
                    other_slot
                }
            };
            categories[slot].entries.push(entry.clone());
            all.push(entry);
        }

        for category in &mut categories {
            sort_by_name(&mut category.entries);
        }
        sort_by_name(&mut all);

        let by_name = all
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.name.clone(), idx))
            .collect();

        Self {
            categories,
            all,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// `All` first, then every non-empty category in taxonomy order.
    pub fn list_categories(&self) -> Vec<CategorySummary> {
        std::iter::once(CategorySummary {
            name: ALL_SCOPE.to_string(),
            count: self.all.len(),
        })
        .chain(self.non_empty_categories().map(|cat| CategorySummary {
            name: cat.name.clone(),
            count: cat.entries.len(),
        }))
        .collect()
    }

    pub fn non_empty_categories(&self) -> impl Iterator<Item = &CategoryEntries> {
        self.categories.iter().filter(|cat| !cat.entries.is_empty())
    }

    /// Entries of one category; empty for unknown names.
    pub fn category(&self, name: &str) -> &[AppEntry] {
        self.categories
            .iter()
            .find(|cat| cat.name == name)
            .map(|cat| cat.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Every entry, sorted by name.
    pub fn all(&self) -> &[AppEntry] {
        &self.all
    }

    /// Exact, case-sensitive name lookup.
    pub fn find(&self, name: &str) -> Option<&AppEntry> {
        self.by_name.get(name).map(|idx| &self.all[*idx])
    }
}

fn sort_by_name(entries: &mut [AppEntry]) {
    entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Provenance;

    fn entry(name: &str, category: &str) -> AppEntry {
        AppEntry {
            name: name.to_string(),
            command: name.to_lowercase(),
            description: String::new(),
            provenance: Provenance::PathScan,
            category: category.to_string(),
        }
    }

    #[test]
    fn categories_sort_case_insensitively() {
        let catalog = Catalog::build(
            vec![
                entry("Zed", "Programming"),
                entry("atom", "Programming"),
                entry("Bvim", "Programming"),
            ],
            &Taxonomy::builtin(),
        );
        let names: Vec<_> = catalog
            .category("Programming")
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["atom", "Bvim", "Zed"]);
    }

    #[test]
    fn case_ties_keep_merge_order() {
        let catalog = Catalog::build(
            vec![entry("Firefox", "Internet"), entry("firefox", "Internet")],
            &Taxonomy::builtin(),
        );
        let names: Vec<_> = catalog.all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Firefox", "firefox"]);
        assert_eq!(catalog.find("firefox").map(|e| e.name.as_str()), Some("firefox"));
        assert!(catalog.find("FIREFOX").is_none());
    }

    #[test]
    fn listing_skips_empty_categories_and_leads_with_all() {
        let catalog = Catalog::build(
            vec![entry("steam", "Games"), entry("htop", "System"), entry("x1", "Other")],
            &Taxonomy::builtin(),
        );
        let listed: Vec<_> = catalog
            .list_categories()
            .into_iter()
            .map(|s| (s.name, s.count))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("All".to_string(), 3),
                ("System".to_string(), 1),
                ("Games".to_string(), 1),
                ("Other".to_string(), 1),
            ]
        );
    }

    #[test]
    fn unknown_category_is_filed_as_other() {
        let catalog = Catalog::build(vec![entry("thing", "Nope")], &Taxonomy::builtin());
        assert_eq!(catalog.category(OTHER_CATEGORY).len(), 1);
        assert_eq!(catalog.all()[0].category, OTHER_CATEGORY);
        assert!(catalog.category("Nope").is_empty());
    }

    #[test]
    fn empty_catalog_still_lists_all() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.list_categories().len(), 1);
    }
}
