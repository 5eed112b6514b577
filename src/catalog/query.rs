//! Read-only queries over a catalog snapshot: scopes, search, pagination.

use super::Catalog;
use crate::entry::AppEntry;
use crate::taxonomy::ALL_SCOPE;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    All,
    Category(String),
}

impl Scope {
    /// `All` (any case) selects the synthetic view; anything else names a category.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case(ALL_SCOPE) {
            Scope::All
        } else {
            Scope::Category(value.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Scope::All => ALL_SCOPE,
            Scope::Category(name) => name,
        }
    }
}

impl Catalog {
    pub fn scope(&self, scope: &Scope) -> &[AppEntry] {
        match scope {
            Scope::All => self.all(),
            Scope::Category(name) => self.category(name),
        }
    }

    /// Entries of `scope` whose name, description or command contains
    /// `query`, compared case-insensitively, in the scope's own order. A blank
    /// query returns the whole scope.
    pub fn search(&self, scope: &Scope, query: &str) -> Vec<&AppEntry> {
        let entries = self.scope(scope);
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return entries.iter().collect();
        }
        entries.iter().filter(|entry| entry.matches(&needle)).collect()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub index: usize,
    pub size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0 && self.total_pages > 0
    }

    /// 1-based position of the first item, for numbered listings.
    pub fn first_ordinal(&self) -> usize {
        self.index.saturating_mul(self.size).saturating_add(1)
    }
}

/// Slice `[index * size, index * size + size)` of `seq`, clipped to its bounds.
pub fn paginate<T>(seq: &[T], size: usize, index: usize) -> Result<Page<'_, T>, PageError> {
    if size == 0 {
        return Err(PageError::ZeroPageSize);
    }
    let start = index.saturating_mul(size).min(seq.len());
    let end = start.saturating_add(size).min(seq.len());
    Ok(Page {
        items: &seq[start..end],
        index,
        size,
        total_items: seq.len(),
        total_pages: seq.len().div_ceil(size),
    })
}
