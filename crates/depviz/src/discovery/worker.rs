//! The worker loop.

use super::traversal::Traversal;
use crate::error::Error;
use std::sync::Arc;

/// Process tasks until the traversal shuts down.
///
/// A worker exits only when the shutdown token fires, when its fetch is
/// cancelled by that token, or after recording a failure (which fires the
/// token for everyone else).
pub(super) async fn run(worker: usize, traversal: Arc<Traversal>) {
    loop {
        let package = tokio::select! {
            biased;
            () = traversal.shutdown.cancelled() => break,
            package = traversal.queue.pop() => package,
        };

        if !traversal.visited.claim(&package) {
            tracing::trace!(worker, %package, "already claimed");
            traversal.pending.complete();
            continue;
        }

        tracing::debug!(worker, %package, "fetching dependencies");
        traversal.count_fetch();
        let result = tokio::select! {
            biased;
            () = traversal.shutdown.cancelled() => break,
            result = traversal.fetcher.fetch_dependencies(&package, &traversal.shutdown) => result,
        };

        match result {
            Ok(deps) => {
                traversal.edges.record(&package, &deps);
                // Count the children before releasing the parent.
                traversal.pending.add(deps.len());
                traversal.queue.extend(deps);
                tracing::trace!(worker, %package, backlog = traversal.queue.len(), "queued dependencies");
                if traversal.pending.complete() {
                    tracing::debug!(worker, "no work left");
                }
            }
            Err(source) if source.is_cancelled() && traversal.shutdown.is_cancelled() => break,
            Err(source) => {
                tracing::warn!(worker, %package, error = %source, "fetch failed; stopping traversal");
                traversal.fail(Error::Fetch { package, source });
                break;
            }
        }
    }
    tracing::trace!(worker, "worker stopped");
}
