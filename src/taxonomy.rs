//! Fixed category taxonomy and the keyword categorizer.
//!
//! The taxonomy is an ordered table of `(category, keywords)` rules. An entry
//! belongs to the first rule with any keyword occurring, case-insensitively,
//! in its name, description or command (checked in that order). Rule order
//! matters: `gimp` is listed under both Media and Graphics and always lands
//! in Media. Entries matching nothing go to [`OTHER_CATEGORY`].

use crate::entry::{AppEntry, EntryData, EntryMap};
use anyhow::{Result, bail};
use std::collections::BTreeSet;

/// Catch-all category; always present in a catalog's category set.
pub const OTHER_CATEGORY: &str = "Other";
/// Name of the synthetic view spanning every category.
pub const ALL_SCOPE: &str = "All";

const BUILTIN_RULES: &[(&str, &[&str])] = &[
    (
        "Programming",
        &["code", "editor", "ide", "python", "java", "git", "vim"],
    ),
    (
        "Security",
        &["security", "hack", "nmap", "wireshark", "metasploit", "burp"],
    ),
    (
        "System",
        &["system", "monitor", "htop", "top", "kill", "systemctl"],
    ),
    (
        "Internet",
        &["browser", "firefox", "chrome", "wget", "curl", "thunderbird"],
    ),
    (
        "Media",
        &["video", "audio", "vlc", "mpv", "gimp", "blender", "spotify"],
    ),
    (
        "Office",
        &["office", "document", "libreoffice", "writer", "calc", "pdf"],
    ),
    (
        "Graphics",
        &["graphics", "design", "gimp", "inkscape", "krita", "darktable"],
    ),
    ("Games", &["game", "steam", "lutris", "wine", "emulator"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    /// Stored lowercased, in declaration order.
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<S: Into<String>>(name: S, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, fields: &[String; 3]) -> bool {
        self.keywords
            .iter()
            .any(|keyword| fields.iter().any(|field| field.contains(keyword.as_str())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    rules: Vec<CategoryRule>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Taxonomy {
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|(name, keywords)| CategoryRule::new(*name, keywords))
                .collect(),
        }
    }

    /// Build a custom table, rejecting names that would collide with the
    /// reserved views or with each other.
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for rule in &rules {
            if rule.name.trim().is_empty() {
                bail!("category names must not be empty");
            }
            if rule.name == OTHER_CATEGORY || rule.name == ALL_SCOPE {
                bail!("category name '{}' is reserved", rule.name);
            }
            if !seen.insert(rule.name.as_str()) {
                bail!("duplicate category '{}'", rule.name);
            }
            if rule.keywords.iter().any(|k| k.is_empty()) {
                bail!("category '{}' has an empty keyword", rule.name);
            }
        }
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
                name: rule.name,
            })
            .collect();
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Every category an entry can land in, in display order; `Other` last.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .map(|rule| rule.name.as_str())
            .chain(std::iter::once(OTHER_CATEGORY))
    }

    pub fn contains(&self, category: &str) -> bool {
        self.category_names().any(|name| name == category)
    }

    pub fn categorize(&self, name: &str, description: &str, command: &str) -> &str {
        let fields = [
            name.to_lowercase(),
            description.to_lowercase(),
            command.to_lowercase(),
        ];
        self.rules
            .iter()
            .find(|rule| rule.matches(&fields))
            .map(|rule| rule.name.as_str())
            .unwrap_or(OTHER_CATEGORY)
    }

    /// Assign a category to every merged entry, preserving merge order.
    pub fn categorize_all(&self, merged: EntryMap) -> Vec<AppEntry> {
        merged
            .into_iter()
            .map(|(name, data): (String, EntryData)| {
                let category = self
                    .categorize(&name, &data.description, &data.command)
                    .to_string();
                AppEntry::from_data(name, data, category)
            })
            .collect()
    }
}
