//! The set of packages already claimed for fetching.

use crate::domain::PackageId;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Packages that some worker has claimed during one traversal.
///
/// A package enters the set exactly once, when [`claim`](Self::claim)
/// succeeds, and never leaves it. This is what bounds the traversal on
/// diamonds and cycles.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<PackageId>>,
}

impl VisitedSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for fetching.
    ///
    /// Returns `true` if the caller now owns `id`, `false` if another claim
    /// got there first. The check and the insert happen under one lock.
    pub fn claim(&self, id: &PackageId) -> bool {
        let mut visited = self.lock();
        if visited.contains(id) {
            return false;
        }
        visited.insert(id.clone());
        true
    }

    /// Number of claimed packages.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<PackageId>> {
        // The set stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
