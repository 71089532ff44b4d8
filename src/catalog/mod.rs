//! Catalog store: the collaborator contract and its SQLite implementation.

mod sqlite;

pub use sqlite::SqliteCatalog;

use std::path::Path;

use crate::{CatalogItem, Result};

/// The persistent store of ingested tracks, shared by all digesters.
///
/// Implementations must be safe for concurrent use from many worker threads;
/// the pipeline holds one handle behind an `Arc` and clones it per digester.
pub trait Catalog: Send + Sync {
    /// Number of existing records with exactly this path (0 or more).
    fn count_by_path(&self, path: &Path) -> Result<u64>;

    /// Write one item. A failure here is fatal to the run once the
    /// coordinator observes it.
    fn insert(&self, item: &CatalogItem) -> Result<()>;

    /// Highest ordinal among all records, or None when the catalog is empty.
    fn max_ordinal(&self) -> Result<Option<u32>>;
}
