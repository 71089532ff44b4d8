//! Public and internal types for the cratedigger API and pipeline.

use std::path::PathBuf;

/// One cataloged track (same shape as a row in the catalog DB).
///
/// Built by a digester at admission time and handed to the catalog; never
/// read back or mutated by this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogItem {
    /// Random alphanumeric identifier, generated at insertion. Primary key.
    pub id: String,
    /// Absolute filesystem path. Natural dedup key.
    pub path: String,
    /// Queue position. Strictly increasing across all items, all runs.
    pub ordinal: u32,
    /// Play counter, 0 at insertion. Owned by whatever consumes the queue.
    pub plays: u32,
}

/// Outcome of digesting one admitted (non-duplicate) path.
///
/// Skipped duplicates produce no result at all; `error` is set only when the
/// catalog insert failed. The coordinator treats any error here as fatal to
/// the run.
pub struct DigestResult {
    pub path: PathBuf,
    pub error: Option<crate::Error>,
}

/// Counts from a completed ingest run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Tracks written to the catalog this run.
    pub inserted: usize,
    /// Candidate paths skipped because the catalog already had them.
    pub skipped: usize,
}

/// Options for [`ingest_dir`](crate::ingest_dir).
#[derive(Clone, Debug)]
pub struct IngestOpts {
    /// Number of concurrent digester workers.
    pub num_digesters: usize,
    /// File extension admitted by the walk, without the dot. Matched
    /// byte-for-byte (case-sensitive), so the default admits `a.mp3` but
    /// not `a.MP3`.
    pub extension: String,
    /// Override the id generator (length → id). When None, uses
    /// [`new_id`](crate::ident::new_id).
    pub id_gen: Option<fn(usize) -> String>,
    /// Verbose output.
    pub verbose: bool,
}

impl Default for IngestOpts {
    fn default() -> Self {
        IngestOpts {
            num_digesters: crate::pipeline::DEFAULT_NUM_DIGESTERS,
            extension: crate::pipeline::DEFAULT_EXTENSION.to_string(),
            id_gen: None,
            verbose: false,
        }
    }
}
