//! Application-descriptor (`.desktop`) collector.
//!
//! Directories are read in the configured order (system, system-local,
//! user-local). Within this source the first descriptor to claim a name keeps
//! it; files inside one directory are visited in file-name order so the
//! outcome does not depend on `read_dir` ordering.

use super::{EntrySource, SourceReadError, SourceReport};
use crate::entry::{DEFAULT_MANIFEST_DESCRIPTION, EntryData, EntryMap, Provenance};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DESCRIPTOR_EXTENSION: &str = "desktop";
pub const ENTRY_SECTION: &str = "Desktop Entry";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestParseError {
    #[error("line {line}: key/value pair before any section header")]
    MissingSectionHeader { line: usize },
    #[error("line {line}: expected `[section]` or `key=value`")]
    InvalidLine { line: usize },
    #[error("line {line}: duplicate section [{section}]")]
    DuplicateSection { line: usize, section: String },
    #[error("line {line}: duplicate key `{key}` in [{section}]")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },
}

/// Parsed descriptor: section name to key/value pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Descriptor {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Descriptor {
    pub fn parse(input: &str) -> Result<Self, ManifestParseError> {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let Some(name) = rest.strip_suffix(']') else {
                    return Err(ManifestParseError::InvalidLine { line: line_no });
                };
                let name = name.trim().to_string();
                if sections.contains_key(&name) {
                    return Err(ManifestParseError::DuplicateSection {
                        line: line_no,
                        section: name,
                    });
                }
                sections.insert(name.clone(), BTreeMap::new());
                current = Some(name);
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ManifestParseError::InvalidLine { line: line_no });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(ManifestParseError::InvalidLine { line: line_no });
            }
            let Some(section) = current.as_ref() else {
                return Err(ManifestParseError::MissingSectionHeader { line: line_no });
            };
            let pairs = sections.entry(section.clone()).or_default();
            match pairs.entry(key.to_string()) {
                Entry::Occupied(_) => {
                    return Err(ManifestParseError::DuplicateKey {
                        line: line_no,
                        section: section.clone(),
                        key: key.to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(value.trim().to_string());
                }
            }
        }

        Ok(Self { sections })
    }

    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(name)
    }
}

/// Fields extracted from one `[Desktop Entry]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub command: String,
    pub description: String,
}

/// Why a well-formed descriptor still yields no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoEntrySection,
    Hidden,
    EmptyCommand,
}

/// Pull name/command/description out of a parsed descriptor.
///
/// `stem` is the file name without extension, used when `Name` is absent.
pub fn extract_entry(descriptor: &Descriptor, stem: &str) -> Result<ManifestEntry, Rejection> {
    let section = descriptor
        .section(ENTRY_SECTION)
        .ok_or(Rejection::NoEntrySection)?;

    if flag_set(section, "NoDisplay") || flag_set(section, "Hidden") {
        return Err(Rejection::Hidden);
    }

    let command = section
        .get("Exec")
        .and_then(|exec| exec.split_whitespace().next())
        .unwrap_or_default()
        .to_string();
    if command.is_empty() {
        return Err(Rejection::EmptyCommand);
    }

    let name = non_blank(section, "Name").unwrap_or(stem).to_string();
    let description = non_blank(section, "Comment")
        .or_else(|| non_blank(section, "GenericName"))
        .unwrap_or(DEFAULT_MANIFEST_DESCRIPTION)
        .to_string();

    Ok(ManifestEntry {
        name,
        command,
        description,
    })
}

fn flag_set(section: &BTreeMap<String, String>, key: &str) -> bool {
    section
        .get(key)
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn non_blank<'a>(section: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    section
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// Reads descriptor files from an ordered list of directories.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    dirs: Vec<PathBuf>,
}

impl ManifestSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    fn collect_dir(&self, dir: &Path, entries: &mut EntryMap, report: &mut SourceReport) {
        if !dir.is_dir() {
            tracing::debug!("manifest directory {} absent", dir.display());
            return;
        }

        let files = match descriptor_files(dir) {
            Ok(files) => files,
            Err(err) => {
                report.skip(SourceReadError::Directory {
                    path: dir.to_path_buf(),
                    reason: err.to_string(),
                });
                return;
            }
        };

        for path in files {
            let Some(entry) = read_descriptor(&path, report) else {
                continue;
            };
            if entries.contains_key(&entry.name) {
                tracing::debug!("{} shadowed by an earlier descriptor", entry.name);
                continue;
            }
            entries.insert(
                entry.name,
                EntryData {
                    command: entry.command,
                    description: entry.description,
                    provenance: Provenance::Manifest,
                },
            );
        }
    }
}

impl EntrySource for ManifestSource {
    fn label(&self) -> &'static str {
        "manifest"
    }

    fn provenance(&self) -> Provenance {
        Provenance::Manifest
    }

    fn collect(&self, report: &mut SourceReport) -> EntryMap {
        let mut entries = EntryMap::new();
        for dir in &self.dirs {
            self.collect_dir(dir, &mut entries, report);
        }
        entries
    }
}

fn descriptor_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for item in fs::read_dir(dir)? {
        let path = item?.path();
        let has_extension = path
            .extension()
            .map(|ext| ext == DESCRIPTOR_EXTENSION)
            .unwrap_or(false);
        if has_extension && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_descriptor(path: &Path, report: &mut SourceReport) -> Option<ManifestEntry> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            report.skip(SourceReadError::File {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
            return None;
        }
    };

    let descriptor = match Descriptor::parse(&contents) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            report.skip(SourceReadError::Malformed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
            return None;
        }
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match extract_entry(&descriptor, &stem) {
        Ok(entry) => Some(entry),
        Err(rejection) => {
            tracing::trace!("{} yields no entry: {rejection:?}", path.display());
            None
        }
    }
}
