//! Concurrent dependency discovery.
//!
//! [`GraphBuilder`] walks the dependency graph of one root package
//! breadth-first with a fixed pool of workers and returns every edge it
//! found. The pieces, each usable on its own:
//!
//! - [`TaskQueue`]: growable queue of packages waiting to be fetched
//! - [`VisitedSet`]: packages already claimed, so each is fetched once
//! - [`PendingWork`]: queued plus in-progress tasks; zero means done
//! - [`EdgeCollector`]: edges recorded by the workers
//!
//! # Termination
//!
//! A traversal ends in exactly one of three ways:
//!
//! 1. **Drained**: the pending count reached zero. Every reachable package
//!    has been fetched and the collected edges are returned.
//! 2. **Failed**: a fetch failed. The first failure is kept, every other
//!    worker is stopped and the error is returned. No partial graph is
//!    returned.
//! 3. **Cancelled**: the caller's token fired. Workers stop and
//!    [`Error::Cancelled`] is returned.
//!
//! In every case all workers have exited before [`GraphBuilder::build`]
//! returns.

mod edges;
mod pending;
mod queue;
mod traversal;
mod visited;
mod worker;

pub use edges::EdgeCollector;
pub use pending::PendingWork;
pub use queue::TaskQueue;
pub use visited::VisitedSet;

use crate::config::DEFAULT_CONCURRENCY;
use crate::domain::{Edge, PackageId};
use crate::error::{Error, Result};
use crate::provider::Fetcher;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use traversal::Traversal;

/// Builds the dependency edge list of a root package.
#[derive(Clone)]
pub struct GraphBuilder {
    fetcher: Arc<dyn Fetcher>,
    workers: usize,
}

impl fmt::Debug for GraphBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("fetcher", &"<dyn Fetcher>")
            .field("workers", &self.workers)
            .finish()
    }
}

impl GraphBuilder {
    /// Create a builder with [`DEFAULT_CONCURRENCY`] workers.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            workers: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the number of workers, i.e. the maximum number of concurrent
    /// fetches.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Discover every edge reachable from `root`.
    ///
    /// Each reachable package is fetched at most once, no matter how many
    /// packages depend on it, and cycles terminate. Edges come back in
    /// discovery order, which is not deterministic across runs; the edge
    /// *set* is.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput` if `root` is blank or the worker count is 0
    /// - `Error::Fetch` for the first failed lookup (e.g. the root does not
    ///   exist)
    /// - `Error::Cancelled` if `cancel` fired before the graph was complete
    /// - `Error::Worker` if a worker task panicked
    pub async fn build(&self, root: &PackageId, cancel: &CancellationToken) -> Result<Vec<Edge>> {
        if root.is_blank() {
            return Err(Error::InvalidInput(
                "Root package name cannot be empty".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(Error::InvalidInput(
                "Worker count must be at least 1".to_string(),
            ));
        }

        let started = Instant::now();
        tracing::info!(%root, workers = self.workers, "starting dependency discovery");

        let traversal = Arc::new(Traversal::new(
            Arc::clone(&self.fetcher),
            cancel.child_token(),
        ));
        traversal.pending.add(1);
        traversal.queue.push(root.clone());

        let mut workers = JoinSet::new();
        for worker in 0..self.workers {
            workers.spawn(worker::run(worker, Arc::clone(&traversal)));
        }

        let drained = loop {
            tokio::select! {
                biased;
                () = traversal.pending.drained() => break true,
                () = traversal.shutdown.cancelled() => break false,
                Some(joined) = workers.join_next() => {
                    // Before shutdown a worker only ends by panicking.
                    if let Err(e) = joined {
                        traversal.fail(Error::Worker(e.to_string()));
                    }
                }
            }
        };

        traversal.shutdown.cancel();
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                traversal.fail(Error::Worker(e.to_string()));
            }
        }

        if let Some(error) = traversal.take_error() {
            tracing::warn!(
                %root,
                error = %error,
                abandoned = traversal.pending.outstanding(),
                "dependency discovery failed"
            );
            return Err(error);
        }
        if !drained {
            tracing::info!(
                %root,
                abandoned = traversal.pending.outstanding(),
                "dependency discovery cancelled"
            );
            return Err(Error::Cancelled);
        }

        let edges = traversal.edges.take();
        tracing::info!(
            %root,
            packages = traversal.visited.len(),
            edges = edges.len(),
            fetches = traversal.fetch_count(),
            elapsed = ?started.elapsed(),
            "dependency discovery complete"
        );
        Ok(edges)
    }
}
