//! Path producer: serial walk under root, candidates handed off one at a time.

use anyhow::{Result, anyhow};
use crossbeam_channel::{Sender, select};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

use super::cancel::CancelToken;

/// True when the entry is a regular file whose extension is exactly `ext`.
/// Byte comparison, so matching is case-sensitive ("mp3" rejects "a.MP3").
pub fn is_candidate(path: &Path, is_file: bool, ext: &str) -> bool {
    is_file && path.extension().is_some_and(|e| e == ext)
}

/// Spawn the walk thread. After traversal ends (complete, failed, or
/// cancelled) it always sends exactly one final outcome on `walk_done_tx`
/// and drops `path_tx`, closing the path channel so digesters drain and exit.
pub fn spawn_walk_thread(
    root: &Path,
    ext: String,
    path_tx: Sender<PathBuf>,
    walk_done_tx: Sender<Result<()>>,
    cancel: CancelToken,
) -> JoinHandle<()> {
    let root = root.to_path_buf();
    thread::spawn(move || {
        let outcome = run_walk_loop(&root, &ext, &path_tx, &cancel);
        // Capacity 1, so this send cannot block.
        let _ = walk_done_tx.send(outcome);
        drop(path_tx);
    })
}

/// Serial recursive walk. Each candidate send is a rendezvous raced against
/// cancellation; any traversal error (missing root included) aborts the
/// remainder of the walk and becomes its final error.
pub fn run_walk_loop(
    root: &Path,
    ext: &str,
    path_tx: &Sender<PathBuf>,
    cancel: &CancelToken,
) -> Result<()> {
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !is_candidate(entry.path(), entry.file_type().is_file(), ext) {
            continue;
        }
        select! {
            send(path_tx, entry.into_path()) -> res => {
                if res.is_err() {
                    // Every digester is gone, which only happens after
                    // cancellation fired.
                    return Err(anyhow!("walk cancelled"));
                }
            }
            recv(cancel.fired()) -> _ => return Err(anyhow!("walk cancelled")),
        }
    }
    Ok(())
}
