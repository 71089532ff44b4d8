//! Run-wide cancellation: one broadcast, fired at most once, observed everywhere.

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use std::sync::Mutex;

/// The fire side of the run's cancellation broadcast.
///
/// Firing drops the inner sender, which disconnects every [`CancelToken`]'s
/// receiver at once — the channel itself never carries a message. `fire` is
/// idempotent and safe from any thread, so the coordinator can run it
/// unconditionally on its exit path and a Ctrl-C handler can race it.
pub struct CancelSignal {
    tx: Mutex<Option<Sender<()>>>,
    rx: Receiver<()>,
}

/// The observe side, cloned into the walk thread and every digester.
#[derive(Clone)]
pub struct CancelToken {
    rx: Receiver<()>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, rx) = bounded::<()>(0);
        CancelSignal {
            tx: Mutex::new(Some(tx)),
            rx,
        }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.rx.clone(),
        }
    }

    pub fn fire(&self) {
        self.tx.lock().unwrap().take();
    }

    pub fn is_fired(&self) -> bool {
        self.tx.lock().unwrap().is_none()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// Channel that disconnects when the signal fires. Use as a `select!`
    /// arm: `recv` stays blocked until cancellation, then errors immediately.
    pub fn fired(&self) -> &Receiver<()> {
        &self.rx
    }

    pub fn is_fired(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }
}
