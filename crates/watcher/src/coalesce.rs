//! Event coalescing
//!
//! Collapses every notification for a path within one debounce cycle into a
//! single pending change. The most recent notification wins.

use autotest_core::{ChangeKind, PendingChange};
use std::collections::HashMap;
use std::path::PathBuf;

/// Changes accumulated since the last evaluation, keyed by relative path
#[derive(Debug, Default)]
pub struct PendingBuffer {
    changes: HashMap<PathBuf, ChangeKind>,
}

impl PendingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change, overwriting any earlier kind for the same path
    pub fn record(&mut self, path: PathBuf, kind: ChangeKind) {
        self.changes.insert(path, kind);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, path: &std::path::Path) -> Option<ChangeKind> {
        self.changes.get(path).copied()
    }

    /// Remove every pending change, returned in path order
    ///
    /// The buffer is empty afterwards and keeps its allocation.
    pub fn drain(&mut self) -> Vec<PendingChange> {
        let mut changes: Vec<PendingChange> = self
            .changes
            .drain()
            .map(|(path, kind)| PendingChange { path, kind })
            .collect();
        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes
    }
}
