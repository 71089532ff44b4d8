//! Pipeline channels and shared state, built once per run by the coordinator.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use crate::{DigestResult, Result};

/// Channels for one run. The walk thread gets `path_tx` and `walk_done_tx`;
/// digesters clone `path_rx` and `result_tx`; the coordinator drains
/// `result_rx` and finally `walk_done_rx`.
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub result_tx: Sender<DigestResult>,
    pub result_rx: Receiver<DigestResult>,
    pub walk_done_tx: Sender<Result<()>>,
    pub walk_done_rx: Receiver<Result<()>>,
    /// Duplicate paths skipped by digesters (log-only outcome, counted here).
    pub skipped: Arc<AtomicUsize>,
}

pub fn create_pipeline_channels() -> PipelineChannels {
    // Rendezvous channels: the walk hands each path directly to whichever
    // digester is free (backpressure, nothing buffered), and results are
    // consumed by the coordinator as they are produced.
    let (path_tx, path_rx) = bounded::<PathBuf>(0);
    let (result_tx, result_rx) = bounded::<DigestResult>(0);
    // Capacity 1 so the walk's single final send can never block.
    let (walk_done_tx, walk_done_rx) = bounded::<Result<()>>(1);

    PipelineChannels {
        path_tx,
        path_rx,
        result_tx,
        result_rx,
        walk_done_tx,
        walk_done_rx,
        skipped: Arc::new(AtomicUsize::new(0)),
    }
}
