//! Digesters: dedup-check, ordinal allocation, and catalog insert per path.

use crossbeam_channel::{Receiver, Sender, select};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use super::ID_LEN;
use super::cancel::CancelToken;
use super::sequence::SequenceAllocator;
use crate::catalog::Catalog;
use crate::{CatalogItem, DigestResult};

/// State shared by the whole digester pool.
struct DigesterShared<C> {
    catalog: Arc<C>,
    seq: Arc<SequenceAllocator>,
    skipped: Arc<AtomicUsize>,
    id_gen: fn(usize) -> String,
}

impl<C> Clone for DigesterShared<C> {
    fn clone(&self) -> Self {
        DigesterShared {
            catalog: Arc::clone(&self.catalog),
            seq: Arc::clone(&self.seq),
            skipped: Arc::clone(&self.skipped),
            id_gen: self.id_gen,
        }
    }
}

/// Spawn the digester pool: every worker pulls from the same path channel
/// (whichever is free takes the next path) and pushes to the same fan-in
/// result channel. Caller must drop its own `result_tx` clone after this so
/// the fan-in closes once all workers exit.
pub fn spawn_digesters<C: Catalog + 'static>(
    num_digesters: usize,
    catalog: Arc<C>,
    seq: Arc<SequenceAllocator>,
    skipped: Arc<AtomicUsize>,
    id_gen: fn(usize) -> String,
    path_rx: Receiver<PathBuf>,
    result_tx: &Sender<DigestResult>,
    cancel: &CancelToken,
) -> Vec<JoinHandle<()>> {
    let shared = DigesterShared {
        catalog,
        seq,
        skipped,
        id_gen,
    };
    (0..num_digesters)
        .map(|_| {
            let shared = shared.clone();
            let path_rx = path_rx.clone();
            let result_tx = result_tx.clone();
            let cancel = cancel.clone();
            thread::spawn(move || digester_loop(&shared, path_rx, result_tx, cancel))
        })
        .collect()
}

/// One worker: take paths until the channel closes or cancellation fires.
/// Emitting a result is also raced against cancellation so a worker never
/// blocks past the run's end.
fn digester_loop<C: Catalog>(
    shared: &DigesterShared<C>,
    path_rx: Receiver<PathBuf>,
    result_tx: Sender<DigestResult>,
    cancel: CancelToken,
) {
    loop {
        let path = select! {
            recv(path_rx) -> msg => match msg {
                Ok(path) => path,
                Err(_) => break,
            },
            recv(cancel.fired()) -> _ => break,
        };
        let Some(result) = digest_path(shared, path) else {
            continue;
        };
        select! {
            send(result_tx, result) -> res => {
                if res.is_err() {
                    break;
                }
            }
            recv(cancel.fired()) -> _ => break,
        }
    }
}

/// Dedup-check one path and, when new, catalog it.
///
/// Returns None for duplicates (skips emit nothing and consume no ordinal);
/// Some for every insert attempt, carrying the insert error if any. A failed
/// existence check is logged and treated as "not found" — the optimistic
/// choice, accepting a duplicate over dropping a track.
fn digest_path<C: Catalog>(shared: &DigesterShared<C>, path: PathBuf) -> Option<DigestResult> {
    let count = match shared.catalog.count_by_path(&path) {
        Ok(count) => count,
        Err(err) => {
            warn!(
                "existence check failed for {}: {:#}; treating as new",
                path.display(),
                err
            );
            0
        }
    };
    if count > 0 {
        info!("{} SKIPPING", path.display());
        shared.skipped.fetch_add(1, Ordering::Relaxed);
        return None;
    }

    let ordinal = shared.seq.next();
    let item = CatalogItem {
        id: (shared.id_gen)(ID_LEN),
        path: path.to_string_lossy().into_owned(),
        ordinal,
        plays: 0,
    };

    info!("{}", path.display());

    let error = shared.catalog.insert(&item).err();
    if let Some(err) = &error {
        warn!("could not insert {}: {:#}", path.display(), err);
    }
    Some(DigestResult { path, error })
}
