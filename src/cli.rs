use clap::Parser;
use std::path::PathBuf;

use crate::IngestOpts;
use crate::pipeline::DEFAULT_NUM_DIGESTERS;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
    pub const DB_FILENAME: &'static str = ".cratedigger.db";
}

/// Concurrent mp3 ingester with a persistent, ordered play queue.
#[derive(Clone, Parser)]
#[command(name = "cratedigger")]
#[command(about = "Scan a directory for mp3 files and catalog each new one at the back of the play queue.")]
pub struct Cli {
    /// Directory to scan. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Path to the catalog database. Default: `.cratedigger.db` in DIR.
    #[arg(long, short)]
    pub db: Option<PathBuf>,

    /// Number of concurrent digester workers.
    #[arg(long, default_value_t = DEFAULT_NUM_DIGESTERS)]
    pub digesters: usize,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    /// Get the catalog path, defaulting to the hidden catalog file in the
    /// target directory.
    pub fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| self.dir.join(DefaultArgs::DB_FILENAME))
    }

    pub fn to_opts(&self) -> IngestOpts {
        IngestOpts {
            num_digesters: self.digesters,
            verbose: self.verbose.unwrap_or(false),
            ..Default::default()
        }
    }
}
