//! Outstanding-work accounting for one traversal.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Counts tasks that are queued or being processed.
///
/// Every task is counted once when it is enqueued and uncounted once when
/// its processing finishes. A worker counts a package's children *before*
/// uncounting the package itself, so the count only reaches zero when the
/// whole reachable graph has been processed. Reaching zero fires the
/// drained signal, which is what ends a successful traversal.
#[derive(Debug, Default)]
pub struct PendingWork {
    count: AtomicUsize,
    drained: CancellationToken,
}

impl PendingWork {
    /// Create a counter with no outstanding work.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `n` newly enqueued tasks.
    pub fn add(&self, n: usize) {
        if n > 0 {
            self.count.fetch_add(n, Ordering::SeqCst);
        }
    }

    /// Uncount one finished task.
    ///
    /// Returns `true` if this was the last outstanding task, in which case
    /// the drained signal has fired.
    pub fn complete(&self) -> bool {
        let previous = self.count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "completed more tasks than were added");
        if previous == 1 {
            self.drained.cancel();
            true
        } else {
            false
        }
    }

    /// Number of tasks queued or in progress.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Resolves once the count reaches zero.
    pub fn drained(&self) -> WaitForCancellationFuture<'_> {
        self.drained.cancelled()
    }
}
