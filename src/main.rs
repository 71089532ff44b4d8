//! Cratedigger CLI: scan a directory and catalog new mp3 files into the play queue.

use anyhow::{Context, Result};
use clap::Parser;
use cratedigger::catalog::SqliteCatalog;
use cratedigger::cli::Cli;
use cratedigger::pipeline::{CancelSignal, run_pipeline};
use cratedigger::utils::setup_logging;
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let opts = cli.to_opts();
    setup_logging(opts.verbose);

    let catalog = Arc::new(SqliteCatalog::open(&cli.db_path())?);

    let cancel = Arc::new(CancelSignal::new());
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || cancel_handler.fire()).context("set Ctrl+C handler")?;

    let summary = run_pipeline(&cli.dir, catalog, &opts, cancel)?;
    log::info!(
        "done: {} inserted, {} already cataloged",
        summary.inserted,
        summary.skipped
    );
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
