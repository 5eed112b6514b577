//! Entry data shared by every collector and by the catalog.
//!
//! Sources produce [`EntryData`] keyed by display name; the merger tags each
//! survivor with its [`Provenance`] and the categorizer turns it into an
//! [`AppEntry`]. Entries are never mutated once a catalog owns them.

use serde::Serialize;
use std::collections::BTreeMap;

/// Description used for descriptor files without `Comment` or `GenericName`.
pub const DEFAULT_MANIFEST_DESCRIPTION: &str = "Desktop Application";
/// Description given to every executable found on the search path.
pub const DEFAULT_PATH_DESCRIPTION: &str = "Command line tool";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Manifest,
    PathScan,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Manifest => "manifest",
            Provenance::PathScan => "path_scan",
        }
    }

    /// Merge rank; the higher rank wins a name collision.
    pub fn precedence(&self) -> u8 {
        match self {
            Provenance::Manifest => 2,
            Provenance::PathScan => 1,
        }
    }

    /// Short label front-ends show next to an entry.
    pub fn display_hint(&self) -> &'static str {
        match self {
            Provenance::Manifest => "GUI App",
            Provenance::PathScan => "CLI Tool",
        }
    }
}

/// Raw candidate as produced by a source, before categorization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryData {
    pub command: String,
    pub description: String,
    pub provenance: Provenance,
}

/// Name-keyed output of a single source. `BTreeMap` keeps iteration
/// deterministic for everything downstream.
pub type EntryMap = BTreeMap<String, EntryData>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AppEntry {
    pub name: String,
    pub command: String,
    pub description: String,
    pub provenance: Provenance,
    pub category: String,
}

impl AppEntry {
    pub fn from_data(name: String, data: EntryData, category: String) -> Self {
        Self {
            name,
            command: data.command,
            description: data.description,
            provenance: data.provenance,
            category,
        }
    }

    /// True when the lowercased `query` occurs in name, description or command.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.name.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
            || self.command.to_lowercase().contains(query_lower)
    }

    /// Description cut to at most `max` characters, ending in `...` when cut.
    pub fn truncated_description(&self, max: usize) -> String {
        truncate_chars(&self.description, max)
    }
}

/// Cut `value` to `max` characters, marking the cut with `...`.
pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return value.chars().take(max).collect();
    }
    let mut out: String = value.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
