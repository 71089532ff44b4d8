//! Pipeline coordinator: seed, spawn, drain fan-in, first error wins, join.

use anyhow::anyhow;
use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;

use super::cancel::CancelSignal;
use super::context::{PipelineChannels, create_pipeline_channels};
use super::digest::spawn_digesters;
use super::sequence::SequenceAllocator;
use super::walk::spawn_walk_thread;
use crate::catalog::Catalog;
use crate::{Error, IngestOpts, IngestSummary, Result};

/// Run one ingest pass over `root` against `catalog`.
///
/// Owns the run lifecycle: seeds the ordinal allocator from the catalog,
/// starts the walk thread and the digester pool, drains the fan-in channel,
/// and joins everything before returning. The first fatal error observed
/// (a failed insert, or the walk's own failure) fires cancellation and
/// becomes the run's error; later errors are drained and discarded.
/// Cancellation is also fired unconditionally on the way out so nothing is
/// left blocked, and `cancel` may additionally be fired externally (Ctrl-C).
pub fn run_pipeline<C: Catalog + 'static>(
    root: &Path,
    catalog: Arc<C>,
    opts: &IngestOpts,
    cancel: Arc<CancelSignal>,
) -> Result<IngestSummary> {
    let seq = Arc::new(SequenceAllocator::seed_from_catalog(catalog.as_ref()));

    let PipelineChannels {
        path_tx,
        path_rx,
        result_tx,
        result_rx,
        walk_done_tx,
        walk_done_rx,
        skipped,
    } = create_pipeline_channels();

    let walk_handle = spawn_walk_thread(
        root,
        opts.extension.clone(),
        path_tx,
        walk_done_tx,
        cancel.token(),
    );

    let id_gen = opts.id_gen.unwrap_or(crate::ident::new_id);
    let digester_handles = spawn_digesters(
        opts.num_digesters.max(1),
        Arc::clone(&catalog),
        Arc::clone(&seq),
        Arc::clone(&skipped),
        id_gen,
        path_rx,
        &result_tx,
        &cancel.token(),
    );

    // Supervisor: join the pool, then drop the last result sender so the
    // drain loop below observes the fan-in channel closing.
    let supervisor = thread::spawn(move || {
        for handle in digester_handles {
            let _ = handle.join();
        }
        drop(result_tx);
    });

    let mut first_error: Option<Error> = None;
    let mut inserted = 0_usize;
    while let Ok(result) = result_rx.recv() {
        match result.error {
            None => inserted += 1,
            Some(err) if first_error.is_none() => {
                // Stop admitting new work; keep draining so no digester is
                // left blocked on the fan-in send.
                cancel.fire();
                first_error = Some(err);
            }
            Some(_) => {}
        }
    }
    debug!("fan-in closed: {} inserted so far", inserted);

    // The walk's single final outcome. Its "walk cancelled" error collapses
    // into whichever error fired cancellation above.
    if let Ok(Err(err)) = walk_done_rx.recv()
        && first_error.is_none()
    {
        first_error = Some(err);
    }

    walk_handle
        .join()
        .map_err(|_| anyhow!("walk thread panicked"))?;
    supervisor
        .join()
        .map_err(|_| anyhow!("digester supervisor panicked"))?;
    cancel.fire();

    match first_error {
        Some(err) => Err(err),
        None => Ok(IngestSummary {
            inserted,
            skipped: skipped.load(Ordering::Relaxed),
        }),
    }
}
