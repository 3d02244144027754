//! Collection of discovered dependency edges.

use crate::domain::{Edge, PackageId};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Edges recorded by the workers of one traversal.
///
/// Adding never blocks on a consumer: edges accumulate here and are taken
/// in one piece once every worker has stopped.
#[derive(Debug, Default)]
pub struct EdgeCollector {
    edges: Mutex<Vec<Edge>>,
}

impl EdgeCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one edge `from -> to` for each of `deps`, in order.
    pub fn record(&self, from: &PackageId, deps: &[PackageId]) {
        if deps.is_empty() {
            return;
        }
        self.lock()
            .extend(deps.iter().map(|to| Edge::new(from.clone(), to.clone())));
    }

    /// Take every recorded edge, leaving the collector empty.
    pub fn take(&self) -> Vec<Edge> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Edge>> {
        self.edges.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_edges_in_dependency_order() {
        let edges = EdgeCollector::new();
        let deps: Vec<PackageId> = vec!["b".into(), "c".into()];
        edges.record(&"a".into(), &deps);
        edges.record(&"b".into(), &[]);

        let taken = edges.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].to_string(), "a -> b");
        assert_eq!(taken[1].to_string(), "a -> c");
        assert!(edges.take().is_empty());
    }

    #[test]
    fn keeps_duplicate_edges() {
        let edges = EdgeCollector::new();
        edges.record(&"a".into(), &["b".into(), "b".into()]);
        assert_eq!(edges.take().len(), 2);
    }
}
