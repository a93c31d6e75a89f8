//! Last-seen content per monitored URL.

use std::collections::HashMap;

use crate::models::Snapshot;

/// In-memory map from resource URL to its most recent stored [`Snapshot`].
///
/// A missing key means the URL has never been checked successfully. Inserting
/// replaces the previous snapshot wholesale.
#[derive(Debug, Default)]
pub struct ContentStore {
    snapshots: HashMap<String, Snapshot>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&Snapshot> {
        self.snapshots.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.snapshots.contains_key(url)
    }

    /// Store `snapshot` for `url`, returning the one it supersedes.
    pub fn insert(&mut self, url: impl Into<String>, snapshot: Snapshot) -> Option<Snapshot> {
        self.snapshots.insert(url.into(), snapshot)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.snapshots.keys().map(String::as_str)
    }
}
