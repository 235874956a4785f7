//! One-shot, idempotent close flag shared by every task using a connection.

use tokio::sync::watch;

/// Flag that flips from open to closed exactly once.
///
/// Any number of tasks may call [`trigger`](CloseSignal::trigger)
/// concurrently; exactly one of them observes the transition. Tasks
/// suspended in [`closed`](CloseSignal::closed) wake as soon as it happens.
#[derive(Debug)]
pub struct CloseSignal {
    tx: watch::Sender<bool>,
}

impl Default for CloseSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CloseSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Mark the signal closed. Returns `true` only for the call that closed it.
    pub fn trigger(&self) -> bool {
        !self.tx.send_replace(true)
    }

    pub fn is_closed(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the signal has been triggered.
    pub async fn closed(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so `wait_for` only returns once the
        // value is true.
        let _ = rx.wait_for(|closed| *closed).await;
    }
}
