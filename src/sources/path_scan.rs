//! Search-path executable collector.
//!
//! Walks the directories of the search-path variable in order, one level
//! deep, and admits each distinct executable file name once. A directory
//! listed more than once (by spelling or through symlinks) is read once. A
//! global cap bounds the scan: the first admissible name past the cap ends
//! it and the remaining directories are never opened.

use super::{EntrySource, SourceReadError, SourceReport};
use crate::entry::{DEFAULT_PATH_DESCRIPTION, EntryData, EntryMap, Provenance};
use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PATH_CAP: usize = 1000;
/// Names this short or shorter are ambiguous (`cc`, `[`, `ls`) and skipped.
pub const MIN_NAME_LEN: usize = 3;
/// Upper bound on names read from one directory.
pub const MAX_DIR_LISTING: usize = 65_536;

#[derive(Debug, Clone)]
pub struct PathScanSource {
    dirs: Vec<PathBuf>,
    cap: usize,
}

impl PathScanSource {
    /// Build from a raw search-path value (`PATH` syntax for this platform).
    pub fn from_search_path(search_path: Option<&OsString>, cap: usize) -> Self {
        let dirs = search_path
            .map(|value| env::split_paths(value).collect())
            .unwrap_or_default();
        Self::new(dirs, cap)
    }

    pub fn new(dirs: Vec<PathBuf>, cap: usize) -> Self {
        Self { dirs, cap }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl EntrySource for PathScanSource {
    fn label(&self) -> &'static str {
        "path-scan"
    }

    fn provenance(&self) -> Provenance {
        Provenance::PathScan
    }

    fn collect(&self, report: &mut SourceReport) -> EntryMap {
        let mut entries = EntryMap::new();

        'dirs: for dir in distinct_dirs(&self.dirs) {
            let names = match sorted_names(dir) {
                Ok(names) => names,
                Err(err) => {
                    report.skip(SourceReadError::Directory {
                        path: dir.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            for name in names {
                if entries.contains_key(&name) || !admissible(dir, &name) {
                    continue;
                }
                if entries.len() >= self.cap {
                    report.cap_reached = true;
                    tracing::warn!(
                        "path scan stopped at cap of {} executables in {}",
                        self.cap,
                        dir.display()
                    );
                    break 'dirs;
                }
                entries.insert(
                    name.clone(),
                    EntryData {
                        command: name,
                        description: DEFAULT_PATH_DESCRIPTION.to_string(),
                        provenance: Provenance::PathScan,
                    },
                );
            }
        }

        entries
    }
}

/// Existing directories in search order, each physical directory once.
fn distinct_dirs(dirs: &[PathBuf]) -> Vec<&PathBuf> {
    let mut visited = BTreeSet::new();
    dirs.iter()
        .filter(|dir| !dir.as_os_str().is_empty() && dir.is_dir())
        .filter(|dir| {
            let key = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
            let fresh = visited.insert(key);
            if !fresh {
                tracing::trace!("{} already scanned", dir.display());
            }
            fresh
        })
        .collect()
}

fn sorted_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for item in fs::read_dir(dir)?.take(MAX_DIR_LISTING) {
        // Names that are not valid UTF-8 cannot round-trip as a command string.
        if let Ok(name) = item?.file_name().into_string() {
            names.push(name);
        }
    }
    if names.len() == MAX_DIR_LISTING {
        tracing::warn!(
            "{} listing truncated at {MAX_DIR_LISTING} names",
            dir.display()
        );
    }
    names.sort();
    Ok(names)
}

fn admissible(dir: &Path, name: &str) -> bool {
    if name.starts_with('.') || name.chars().count() < MIN_NAME_LEN {
        return false;
    }
    let path = dir.join(name);
    match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => executable_by_current_user(&path),
        _ => false,
    }
}

#[cfg(unix)]
pub(crate) fn executable_by_current_user(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

#[cfg(not(unix))]
pub(crate) fn executable_by_current_user(path: &Path) -> bool {
    path.is_file()
}
