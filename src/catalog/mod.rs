//! Catalog: the categorized, sorted result of one scan.
//!
//! `Catalog` (in `index`) is immutable once built; `query` adds scopes,
//! search and pagination on top of it; `store` holds the current catalog for
//! concurrent readers and runs rescans.

pub mod index;
pub mod query;
pub mod stats;
pub mod store;

pub use index::{Catalog, CategoryEntries, CategorySummary};
pub use query::{DEFAULT_PAGE_SIZE, Page, PageError, Scope, paginate};
pub use stats::CatalogStats;
pub use store::{CatalogStore, ScanError, ScanHandle};
