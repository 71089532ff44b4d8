//! Ordinal allocation: one locked counter shared by all digesters.

use log::{info, warn};
use std::sync::Mutex;

use crate::catalog::Catalog;

/// Source of queue positions for one pipeline run.
///
/// A single counter behind a mutex: every `next` call observes every earlier
/// call, so ordinals are strictly increasing across all digesters regardless
/// of which worker took which path. Lives for one run only; the catalog's
/// stored max ordinal is the durable state that seeds the next run.
pub struct SequenceAllocator {
    current: Mutex<u32>,
}

impl SequenceAllocator {
    pub fn new(seed: u32) -> Self {
        SequenceAllocator {
            current: Mutex::new(seed),
        }
    }

    /// Allocate the next ordinal. First call returns seed + 1.
    pub fn next(&self) -> u32 {
        let mut current = self.current.lock().unwrap();
        *current += 1;
        *current
    }

    /// Seed from the catalog's current max ordinal. Best-effort: a failed
    /// lookup (or an empty catalog) seeds at 0, numbering from the start.
    pub fn seed_from_catalog(catalog: &impl Catalog) -> Self {
        match catalog.max_ordinal() {
            Ok(Some(max)) => {
                info!("using {} as starting queue position", max);
                Self::new(max)
            }
            Ok(None) => Self::new(0),
            Err(err) => {
                warn!("could not find highest queue position: {:#}", err);
                Self::new(0)
            }
        }
    }
}
