//! Patch buffer: an unsorted-on-write, sorted-on-flush overlay of recent
//! changes (§4.8). `Patch` is the persisted, sorted form; `table.rs` keeps
//! an additional in-memory pending map on top of the last-flushed patch.

use std::collections::BTreeMap;

use crate::{
    family::{Change, Record},
    iter,
    key::{Key, KeyRange},
};

/// A sorted sequence of `(key, record-or-tombstone)` changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    changes: BTreeMap<Key, Change>,
}

impl Patch {
    pub fn new() -> Patch {
        Patch::default()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn get(&self, key: &Key) -> Option<&Change> {
        self.changes.get(key)
    }

    pub fn put(&mut self, key: Key, record: Record) {
        self.changes.insert(key, Change::Put(record));
    }

    pub fn delete(&mut self, key: Key) {
        self.changes.insert(key, Change::Delete);
    }

    /// All buffered changes, sorted by key.
    pub fn entries(&self) -> Vec<(Key, Change)> {
        self.changes.iter().map(|(k, c)| (k.clone(), c.clone())).collect()
    }

    pub fn entries_in_range(&self, range: &KeyRange) -> Vec<(Key, Change)> {
        self.changes.iter().filter(|(k, _)| range.contains(k)).map(|(k, c)| (k.clone(), c.clone())).collect()
    }

    /// Combine `self` (more recent) over `other` (older), `self` winning on
    /// duplicates (§4.8: "pending ∪ patch_tablet with pending winning").
    pub fn union(&self, older: &Patch) -> Patch {
        let mut changes = older.changes.clone();
        changes.extend(self.changes.iter().map(|(k, c)| (k.clone(), c.clone())));
        Patch { changes }
    }

    /// Overlay this patch onto tree-read results for a range scan, with
    /// tombstones suppressing the underlying tree entry.
    pub fn overlay_range(&self, range: &KeyRange, tree_entries: Vec<(Key, Record)>) -> Vec<(Key, Record)> {
        iter::merge_overlay(tree_entries, self.entries_in_range(range))
    }

    /// Resolve a specific key against the patch first; `None` means
    /// "consult the data tree" (§4.8 read-of-specific-keys rule).
    pub fn resolve(&self, key: &Key) -> Option<Option<&Record>> {
        match self.changes.get(key) {
            Some(Change::Put(record)) => Some(Some(record)),
            Some(Change::Delete) => Some(None),
            None => None,
        }
    }
}

#[cfg(test)]
#[path = "patch_test.rs"]
mod patch_test;
