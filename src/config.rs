//! Scan configuration.
//!
//! Everything comes from the environment (and binary flags layered on top);
//! there is no configuration file. Variables:
//! - `PATH`: directories for the executable scan.
//! - `APPDECK_PATH_CAP`: upper bound on path-scan entries (default 1000).
//! - `APPDECK_MANIFEST_DIRS`: path list replacing the default descriptor
//!   directories.

use crate::sources::path_scan::DEFAULT_PATH_CAP;
use crate::sources::{EntrySource, ManifestSource, PathScanSource};
use crate::taxonomy::Taxonomy;
use anyhow::{Context, Result, bail};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

pub const ENV_SEARCH_PATH: &str = "PATH";
pub const ENV_PATH_CAP: &str = "APPDECK_PATH_CAP";
pub const ENV_MANIFEST_DIRS: &str = "APPDECK_MANIFEST_DIRS";

const SYSTEM_MANIFEST_DIR: &str = "/usr/share/applications";
const LOCAL_MANIFEST_DIR: &str = "/usr/local/share/applications";

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Descriptor directories, highest priority first.
    pub manifest_dirs: Vec<PathBuf>,
    /// Raw search-path value; `None` disables the executable scan.
    pub search_path: Option<OsString>,
    pub path_cap: usize,
    pub taxonomy: Taxonomy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            manifest_dirs: default_manifest_dirs(),
            search_path: None,
            path_cap: DEFAULT_PATH_CAP,
            taxonomy: Taxonomy::builtin(),
        }
    }
}

impl ScanConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Same as [`ScanConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let manifest_dirs = match lookup(ENV_MANIFEST_DIRS) {
            Some(value) if !value.is_empty() => env::split_paths(&value).collect(),
            _ => default_manifest_dirs(),
        };
        let path_cap = match lookup(ENV_PATH_CAP) {
            Some(value) if !value.is_empty() => parse_cap(&value.to_string_lossy())
                .with_context(|| format!("invalid {ENV_PATH_CAP}"))?,
            _ => DEFAULT_PATH_CAP,
        };

        Ok(Self {
            manifest_dirs,
            search_path: lookup(ENV_SEARCH_PATH),
            path_cap,
            taxonomy: Taxonomy::builtin(),
        })
    }

    /// Collectors in registration order. Merge precedence does not depend on it.
    pub fn sources(&self) -> Vec<Box<dyn EntrySource>> {
        vec![
            Box::new(ManifestSource::new(self.manifest_dirs.clone())),
            Box::new(PathScanSource::from_search_path(
                self.search_path.as_ref(),
                self.path_cap,
            )),
        ]
    }
}

/// System, system-local, then the user's data directory.
pub fn default_manifest_dirs() -> Vec<PathBuf> {
    let mut found = vec![
        PathBuf::from(SYSTEM_MANIFEST_DIR),
        PathBuf::from(LOCAL_MANIFEST_DIR),
    ];
    if let Some(data) = dirs::data_dir() {
        found.push(data.join("applications"));
    }
    found
}

pub fn parse_cap(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => bail!("path cap must be at least 1"),
        Ok(cap) => Ok(cap),
        Err(_) => bail!("path cap must be a positive integer, got '{raw}'"),
    }
}
