//! Application discovery and categorization.
//!
//! A scan runs every configured collector, merges their outputs under the
//! provenance precedence rule, files each entry into the taxonomy and hands
//! back an immutable [`Catalog`]. Front-ends query the catalog (listing,
//! search, pagination) and call [`launch`] for the selected entry.

pub mod catalog;
pub mod config;
pub mod entry;
pub mod launcher;
pub mod logging;
pub mod merge;
pub mod sources;
pub mod taxonomy;

pub use catalog::{
    Catalog, CatalogStats, CatalogStore, CategoryEntries, CategorySummary, DEFAULT_PAGE_SIZE,
    Page, PageError, ScanError, ScanHandle, Scope, paginate,
};
pub use config::ScanConfig;
pub use entry::{AppEntry, EntryData, EntryMap, Provenance};
pub use launcher::{LaunchError, Launched, Launcher, launch};
pub use sources::{EntrySource, ManifestSource, PathScanSource, SourceReadError, SourceReport};
pub use taxonomy::{ALL_SCOPE, CategoryRule, OTHER_CATEGORY, Taxonomy};

use serde::Serialize;
use std::time::{Duration, Instant};

/// What a scan saw besides the catalog itself.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub manifest_entries: usize,
    pub path_entries: usize,
    pub merged_entries: usize,
    pub cap_reached: bool,
    #[serde(serialize_with = "serialize_issues")]
    pub issues: Vec<SourceReadError>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub catalog: Catalog,
    pub report: ScanReport,
}

pub fn scan(config: &ScanConfig) -> Catalog {
    scan_with_report(config).catalog
}

/// Run a full scan on the calling thread. Source-level failures are recorded
/// in the report and never abort the scan.
pub fn scan_with_report(config: &ScanConfig) -> ScanOutcome {
    let started = Instant::now();
    let mut report = ScanReport::default();
    let mut outputs = Vec::new();

    for source in config.sources() {
        let mut source_report = SourceReport::default();
        let entries = source.collect(&mut source_report);
        tracing::debug!("{} produced {} entries", source.label(), entries.len());

        match source.provenance() {
            Provenance::Manifest => report.manifest_entries += entries.len(),
            Provenance::PathScan => report.path_entries += entries.len(),
        }
        report.cap_reached |= source_report.cap_reached;
        report.issues.extend(source_report.issues);
        outputs.push(entries);
    }

    let merged = merge::merge(outputs);
    report.merged_entries = merged.len();
    let catalog = Catalog::build(config.taxonomy.categorize_all(merged), &config.taxonomy);
    report.elapsed = started.elapsed();

    tracing::info!(
        "scan found {} entries ({} from descriptors, {} from search path, {} skipped inputs) in {:?}",
        catalog.len(),
        report.manifest_entries,
        report.path_entries,
        report.issues.len(),
        report.elapsed
    );
    ScanOutcome { catalog, report }
}

fn serialize_issues<S>(issues: &[SourceReadError], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(issues.iter().map(|issue| issue.to_string()))
}
