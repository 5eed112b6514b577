//! Process-wide "current catalog" cell.
//!
//! Readers take an `Arc` snapshot and query it without further locking. A
//! scan runs on its own worker thread and publishes the new catalog with a
//! single reference swap once it is complete, so nobody sees a partial
//! catalog. At most one scan is in flight; further requests are rejected.

use super::Catalog;
use crate::config::ScanConfig;
use crate::{ScanReport, scan_with_report};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("a scan is already running")]
    InProgress,
    #[error("could not start scan worker: {0}")]
    Spawn(String),
    #[error("scan worker panicked")]
    Panicked,
}

#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<Inner>,
}

struct Inner {
    config: ScanConfig,
    current: RwLock<Arc<Catalog>>,
    last_report: RwLock<Option<ScanReport>>,
    scanning: AtomicBool,
    generation: AtomicU64,
}

/// Clears the in-flight flag even if the scan panics.
struct InFlight(Arc<Inner>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.scanning.store(false, Ordering::Release);
    }
}

impl CatalogStore {
    /// Start with an empty catalog; nothing is scanned until asked.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                current: RwLock::new(Arc::new(Catalog::empty())),
                last_report: RwLock::new(None),
                scanning: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.inner.config
    }

    /// Snapshot of the most recently published catalog.
    pub fn current(&self) -> Arc<Catalog> {
        let guard = self
            .inner
            .current
            .read()
            .unwrap_or_else(|err| err.into_inner());
        Arc::clone(&guard)
    }

    pub fn last_report(&self) -> Option<ScanReport> {
        self.inner
            .last_report
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    /// Number of catalogs published so far.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    pub fn is_scanning(&self) -> bool {
        self.inner.scanning.load(Ordering::Acquire)
    }

    /// Start a scan on a worker thread.
    pub fn request_scan(&self) -> Result<ScanHandle, ScanError> {
        let in_flight = self.claim()?;
        let spawned = thread::Builder::new()
            .name("appdeck-scan".to_string())
            .spawn(move || {
                let report = run_and_publish(&in_flight.0);
                drop(in_flight);
                report
            });
        match spawned {
            Ok(join) => Ok(ScanHandle { join }),
            // The closure (and with it the in-flight guard) was dropped.
            Err(err) => Err(ScanError::Spawn(err.to_string())),
        }
    }

    /// Scan on the calling thread, still honouring the single-scan rule.
    pub fn scan_now(&self) -> Result<ScanReport, ScanError> {
        let in_flight = self.claim()?;
        Ok(run_and_publish(&in_flight.0))
    }

    fn claim(&self) -> Result<InFlight, ScanError> {
        self.inner
            .scanning
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScanError::InProgress)?;
        Ok(InFlight(Arc::clone(&self.inner)))
    }
}

fn run_and_publish(inner: &Inner) -> ScanReport {
    let outcome = scan_with_report(&inner.config);
    let catalog = Arc::new(outcome.catalog);
    {
        let mut current = inner
            .current
            .write()
            .unwrap_or_else(|err| err.into_inner());
        *current = catalog;
    }
    *inner
        .last_report
        .write()
        .unwrap_or_else(|err| err.into_inner()) = Some(outcome.report.clone());
    inner.generation.fetch_add(1, Ordering::AcqRel);
    outcome.report
}

/// Handle to a running background scan.
pub struct ScanHandle {
    join: JoinHandle<ScanReport>,
}

impl ScanHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Block until the scan has published its catalog.
    pub fn wait(self) -> Result<ScanReport, ScanError> {
        self.join.join().map_err(|_| ScanError::Panicked)
    }
}
