//! Entry collectors.
//!
//! Each collector turns one provenance (descriptor files, the search path)
//! into a name-keyed [`EntryMap`]. Collectors never fail a scan: unreadable
//! directories and malformed files are recorded as [`SourceReadError`]s on
//! the [`SourceReport`] and skipped. The merger does not care how many
//! sources exist or in which order they run.

pub mod manifest;
pub mod path_scan;

pub use manifest::ManifestSource;
pub use path_scan::PathScanSource;

use crate::entry::{EntryMap, Provenance};
use std::path::PathBuf;
use thiserror::Error;

/// A unit of input a collector had to skip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceReadError {
    #[error("cannot read directory {path}: {reason}")]
    Directory { path: PathBuf, reason: String },
    #[error("cannot read {path}: {reason}")]
    File { path: PathBuf, reason: String },
    #[error("malformed descriptor {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Per-source bookkeeping gathered while collecting.
#[derive(Debug, Default, Clone)]
pub struct SourceReport {
    pub issues: Vec<SourceReadError>,
    /// Set when a collector stopped early on its resource cap.
    pub cap_reached: bool,
}

impl SourceReport {
    pub(crate) fn skip(&mut self, issue: SourceReadError) {
        tracing::debug!("skipping: {issue}");
        self.issues.push(issue);
    }
}

/// Capability shared by all collectors: produce a name-to-entry mapping.
pub trait EntrySource: Send + Sync {
    /// Short identifier used in logs.
    fn label(&self) -> &'static str;

    fn provenance(&self) -> Provenance;

    fn collect(&self, report: &mut SourceReport) -> EntryMap;
}
