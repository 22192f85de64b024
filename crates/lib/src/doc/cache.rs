//! Lazy memoization of the aggregate "modified" predicate.
//!
//! Both document types answer `modified()` by scanning their own pending
//! state and re-querying their children. The answer is memoized here and
//! invalidated by every mutating entry point on the owning node. The cache
//! is deliberately local: ancestors are never notified, they recompute on
//! demand, which keeps the predicate a pure function of reachable state.

use std::cell::Cell;

/// Memo for a node's `modified()` result.
///
/// `None` is the "unknown" state: the value must be recomputed before it can
/// be read. This is interior-mutable and not thread-safe; the document model
/// assumes a single writer (see the crate-level docs).
#[derive(Debug, Clone, Default)]
pub(crate) struct ModifiedCache(Cell<Option<bool>>);

impl ModifiedCache {
    /// Returns the memoized value, if it is still valid.
    pub(crate) fn get(&self) -> Option<bool> {
        self.0.get()
    }

    /// Stores a freshly computed value and returns it.
    pub(crate) fn store(&self, modified: bool) -> bool {
        self.0.set(Some(modified));
        modified
    }

    /// Marks the memo as unknown.
    pub(crate) fn invalidate(&self) {
        self.0.set(None);
    }
}
