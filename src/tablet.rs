//! Leaf block holding a sorted vector of (key, field-map) entries for one
//! field family (§4.3). Tablets never link to further nodes; they are the
//! bottom of the tree.

use crate::{
    err_at,
    family::Record,
    key::{Key, KeyRange},
    Error, Result,
};

/// A strictly key-sorted sequence of `(Key, Record)` entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Tablet {
    entries: Vec<(Key, Record)>,
}

impl Tablet {
    /// Build from already-sorted, unique-keyed entries. Rejects
    /// out-of-order or duplicate input as an invariant violation; callers
    /// are expected to sort upstream (partitions build tablets from
    /// grouped, deduplicated record batches).
    pub fn from_sorted(entries: Vec<(Key, Record)>) -> Result<Tablet> {
        for w in entries.windows(2) {
            if w[0].0 >= w[1].0 {
                return err_at!(
                    InvariantViolation,
                    msg: "tablet entries not strictly sorted at key {:?}",
                    w[1].0
                );
            }
        }
        Ok(Tablet { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn first_key(&self) -> Option<&Key> {
        self.entries.first().map(|(k, _)| k)
    }

    pub fn last_key(&self) -> Option<&Key> {
        self.entries.last().map(|(k, _)| k)
    }

    pub fn read_all(&self) -> &[(Key, Record)] {
        &self.entries
    }

    fn position_of(&self, key: &Key) -> std::result::Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }

    pub fn get(&self, key: &Key) -> Option<&Record> {
        self.position_of(key).ok().map(|i| &self.entries[i].1)
    }

    pub fn read_batch(&self, keys: &[Key]) -> Vec<(Key, Record)> {
        keys.iter()
            .filter_map(|k| self.get(k).map(|rec| (k.clone(), rec.clone())))
            .collect()
    }

    pub fn read_range(&self, range: &KeyRange) -> Vec<(Key, Record)> {
        if range.is_empty() {
            return Vec::new();
        }
        let start = match &range.min {
            Some(min) => self.position_of(min).unwrap_or_else(|i| i),
            None => 0,
        };
        self.entries[start..]
            .iter()
            .take_while(|(k, _)| range.max.as_ref().map_or(true, |max| k <= max))
            .cloned()
            .collect()
    }

    /// New tablet with `additions` merged in and `deletions` removed. Keys
    /// stay sorted. Returns `None` when the result is empty (§4.3).
    pub fn update(&self, additions: &[(Key, Record)], deletions: &[Key]) -> Option<Tablet> {
        use std::collections::BTreeMap;

        let mut merged: BTreeMap<Key, Record> = self.entries.iter().cloned().collect();
        for key in deletions {
            merged.remove(key);
        }
        for (key, record) in additions {
            merged.insert(key.clone(), record.clone());
        }
        if merged.is_empty() {
            None
        } else {
            Some(Tablet { entries: merged.into_iter().collect() })
        }
    }

    /// Drop entries with an empty field-map. Used for non-base families,
    /// which must never persist an empty record (§3 Tablet invariants).
    pub fn prune(&self) -> Option<Tablet> {
        let entries: Vec<_> = self.entries.iter().filter(|(_, rec)| !rec.is_empty()).cloned().collect();
        if entries.is_empty() {
            None
        } else {
            Some(Tablet { entries })
        }
    }

    /// Concatenate two tablets. `left`'s last key must sort strictly before
    /// `right`'s first key.
    pub fn join(left: Tablet, right: Tablet) -> Result<Tablet> {
        if let (Some(lk), Some(rk)) = (left.last_key(), right.first_key()) {
            if lk >= rk {
                return err_at!(
                    InvariantViolation,
                    msg: "tablet join overlap: left last key {:?} >= right first key {:?}",
                    lk, rk
                );
            }
        }
        let mut entries = left.entries;
        entries.extend(right.entries);
        Ok(Tablet { entries })
    }

    /// Split at `split_key`: every key `< split_key` goes left.
    pub fn split_at(&self, split_key: &Key) -> (Tablet, Tablet) {
        let idx = self.position_of(split_key).unwrap_or_else(|i| i);
        let (left, right) = self.entries.split_at(idx);
        (Tablet { entries: left.to_vec() }, Tablet { entries: right.to_vec() })
    }
}

#[cfg(test)]
#[path = "tablet_test.rs"]
mod tablet_test;
