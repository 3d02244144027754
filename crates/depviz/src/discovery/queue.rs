//! Growable multi-consumer queue of packages waiting to be fetched.

use crate::domain::PackageId;
use std::collections::VecDeque;
use std::pin::pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Work queue shared by every worker of one traversal.
///
/// Pushing never blocks and never fails: the backlog grows as needed. Only
/// the worker count bounds how many fetches run at once. Workers pushing
/// discovered dependencies therefore cannot wedge on a full queue while
/// every consumer is itself trying to push.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<PackageId>>,
    available: Notify,
}

impl TaskQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one task and wake one waiting worker.
    pub fn push(&self, id: PackageId) {
        self.lock().push_back(id);
        self.available.notify_one();
    }

    /// Append several tasks, waking one waiting worker per task.
    pub fn extend(&self, ids: impl IntoIterator<Item = PackageId>) {
        let added = {
            let mut tasks = self.lock();
            let before = tasks.len();
            tasks.extend(ids);
            tasks.len() - before
        };
        for _ in 0..added {
            self.available.notify_one();
        }
    }

    /// Wait for and remove the oldest task.
    ///
    /// Cancel-safe: a task is only removed in the same poll that returns it,
    /// so dropping this future never loses work.
    pub async fn pop(&self) -> PackageId {
        loop {
            let mut notified = pin!(self.available.notified());
            // Register before checking so a push in between is not missed.
            notified.as_mut().enable();
            if let Some(id) = self.lock().pop_front() {
                return id;
            }
            notified.await;
        }
    }

    /// Number of queued tasks.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<PackageId>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
