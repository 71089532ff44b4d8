//! Cratedigger: concurrent mp3 ingester with a persistent, ordered play queue

pub mod catalog;
pub mod cli;
pub mod ident;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::path::Path;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::pipeline::CancelSignal;

/// Result alias used by public cratedigger API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: ingest every new `.mp3` under `root` into `catalog`.
///
/// Creates a fresh cancellation signal for the run; use
/// [`pipeline::run_pipeline`] directly when you need to fire cancellation
/// externally (the CLI does, for Ctrl-C).
///
/// Returns the run's [`IngestSummary`], or the first fatal error observed
/// (a failed walk or a failed insert — duplicate paths are skipped, never
/// errors).
pub fn ingest_dir<C>(root: &Path, catalog: Arc<C>, opts: &IngestOpts) -> Result<IngestSummary>
where
    C: Catalog + 'static,
{
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);

    let cancel = Arc::new(CancelSignal::new());
    pipeline::run_pipeline(root, catalog, opts, cancel)
}
