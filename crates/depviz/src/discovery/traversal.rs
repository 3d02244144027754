//! State shared by the workers of one traversal.

use super::edges::EdgeCollector;
use super::pending::PendingWork;
use super::queue::TaskQueue;
use super::visited::VisitedSet;
use crate::error::Error;
use crate::provider::Fetcher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

/// Everything a worker needs, shared behind one `Arc`.
pub(super) struct Traversal {
    pub(super) fetcher: Arc<dyn Fetcher>,
    pub(super) queue: TaskQueue,
    pub(super) visited: VisitedSet,
    pub(super) pending: PendingWork,
    pub(super) edges: EdgeCollector,
    /// Derived from the caller's token; also fired on the first failure.
    pub(super) shutdown: CancellationToken,
    first_error: FirstError,
    fetches: AtomicUsize,
}

impl Traversal {
    pub(super) fn new(fetcher: Arc<dyn Fetcher>, shutdown: CancellationToken) -> Self {
        Self {
            fetcher,
            queue: TaskQueue::new(),
            visited: VisitedSet::new(),
            pending: PendingWork::new(),
            edges: EdgeCollector::new(),
            shutdown,
            first_error: FirstError::default(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Record `error` if it is the first failure, then stop every worker.
    pub(super) fn fail(&self, error: Error) {
        if !self.first_error.set(error) {
            tracing::debug!("traversal already failed; discarding later error");
        }
        self.shutdown.cancel();
    }

    pub(super) fn take_error(&self) -> Option<Error> {
        self.first_error.take()
    }

    pub(super) fn count_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

/// Set-once slot for the error that aborts a traversal.
#[derive(Debug, Default)]
struct FirstError {
    slot: Mutex<Option<Error>>,
}

impl FirstError {
    /// Store `error` unless one is already stored. Returns `true` if stored.
    fn set(&self, error: Error) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(error);
        true
    }

    fn take(&self) -> Option<Error> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
