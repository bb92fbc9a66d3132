use super::*;
use crate::lexicoder::Value;

fn rec(v: i64) -> Record {
    let mut r = Record::new();
    r.insert("v".to_string(), Value::Int(v));
    r
}

fn key(n: u8) -> Key {
    Key::new(vec![n]).unwrap()
}

fn sample() -> Tablet {
    Tablet::from_sorted(vec![(key(1), rec(1)), (key(3), rec(3)), (key(5), rec(5))]).unwrap()
}

#[test]
fn rejects_unsorted_input() {
    assert!(Tablet::from_sorted(vec![(key(3), rec(3)), (key(1), rec(1))]).is_err());
}

#[test]
fn rejects_duplicate_keys() {
    assert!(Tablet::from_sorted(vec![(key(1), rec(1)), (key(1), rec(1))]).is_err());
}

#[test]
fn read_batch_skips_missing_keys() {
    let tablet = sample();
    let found = tablet.read_batch(&[key(1), key(2), key(5)]);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].0, key(1));
    assert_eq!(found[1].0, key(5));
}

#[test]
fn read_range_is_inclusive_bounded() {
    let tablet = sample();
    let range = KeyRange::new(Some(key(2)), Some(key(5)));
    let found = tablet.read_range(&range);
    assert_eq!(found.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>(), vec![key(3), key(5)]);
}

#[test]
fn update_applies_additions_and_deletions() {
    let tablet = sample();
    let updated = tablet.update(&[(key(4), rec(4))], &[key(1)]).unwrap();
    let keys: Vec<_> = updated.read_all().iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec![key(3), key(4), key(5)]);
}

#[test]
fn update_to_empty_returns_none() {
    let tablet = sample();
    assert!(tablet.update(&[], &[key(1), key(3), key(5)]).is_none());
}

#[test]
fn prune_drops_empty_records() {
    let tablet = Tablet::from_sorted(vec![(key(1), Record::new()), (key(2), rec(2))]).unwrap();
    let pruned = tablet.prune().unwrap();
    assert_eq!(pruned.len(), 1);
    assert_eq!(pruned.first_key(), Some(&key(2)));
}

#[test]
fn prune_to_all_empty_returns_none() {
    let tablet = Tablet::from_sorted(vec![(key(1), Record::new())]).unwrap();
    assert!(tablet.prune().is_none());
}

#[test]
fn join_concatenates_disjoint_ranges() {
    let left = Tablet::from_sorted(vec![(key(1), rec(1))]).unwrap();
    let right = Tablet::from_sorted(vec![(key(2), rec(2))]).unwrap();
    let joined = Tablet::join(left, right).unwrap();
    assert_eq!(joined.len(), 2);
}

#[test]
fn join_rejects_overlapping_ranges() {
    let left = Tablet::from_sorted(vec![(key(2), rec(2))]).unwrap();
    let right = Tablet::from_sorted(vec![(key(1), rec(1))]).unwrap();
    assert!(Tablet::join(left, right).is_err());
}

#[test]
fn split_at_partitions_entries() {
    let tablet = sample();
    let (left, right) = tablet.split_at(&key(3));
    assert_eq!(left.read_all().iter().map(|(k, _)| k.clone()).collect::<Vec<_>>(), vec![key(1)]);
    assert_eq!(right.read_all().iter().map(|(k, _)| k.clone()).collect::<Vec<_>>(), vec![key(3), key(5)]);
}
