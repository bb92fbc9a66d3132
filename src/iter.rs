//! Composable pull-based helpers over `(Key, Record)` streams (§9 design
//! note: "replace lazy sequences of records with pull-based iterators ...
//! concat, filter, merge-sorted, take, drop"). These operate on already
//! materialized `Vec`s rather than true lazy iterators; the tree and
//! tablet layers already return fully assembled, sorted vectors, so there
//! is no further laziness to preserve once a read reaches this layer.

use std::cmp::Ordering;

use crate::{
    family::{Change, Record},
    key::Key,
};

/// Merge a sorted base stream with a sorted overlay of changes. The overlay
/// wins on key collisions; a `Change::Delete` in the overlay suppresses the
/// base entry entirely and never appears in the output (§4.8, §9: "apply
/// the override/tombstone rule exactly once per key").
pub fn merge_overlay(base: Vec<(Key, Record)>, overlay: Vec<(Key, Change)>) -> Vec<(Key, Record)> {
    let mut result = Vec::with_capacity(base.len() + overlay.len());
    let mut base = base.into_iter().peekable();
    let mut overlay = overlay.into_iter().peekable();

    loop {
        match (base.peek(), overlay.peek()) {
            (None, None) => break,
            (Some(_), None) => result.push(base.next().expect("peeked Some")),
            (None, Some(_)) => push_change(&mut result, overlay.next().expect("peeked Some")),
            (Some((bk, _)), Some((ok, _))) => match bk.cmp(ok) {
                Ordering::Less => result.push(base.next().expect("peeked Some")),
                Ordering::Greater => push_change(&mut result, overlay.next().expect("peeked Some")),
                Ordering::Equal => {
                    base.next();
                    push_change(&mut result, overlay.next().expect("peeked Some"));
                }
            },
        }
    }
    result
}

fn push_change(out: &mut Vec<(Key, Record)>, (key, change): (Key, Change)) {
    if let Change::Put(record) = change {
        out.push((key, record));
    }
}

/// Apply `offset` then `limit` by client-side drop (§9 Open Question:
/// pushing offset down through subtrees is a documented optimization the
/// core does not implement).
pub fn paginate(entries: Vec<(Key, Record)>, offset: usize, limit: Option<usize>) -> Vec<(Key, Record)> {
    let dropped = entries.into_iter().skip(offset);
    match limit {
        Some(limit) => dropped.take(limit).collect(),
        None => dropped.collect(),
    }
}

#[cfg(test)]
#[path = "iter_test.rs"]
mod iter_test;
