use super::*;
use crate::lexicoder::Value;

fn key(n: u8) -> Key {
    Key::new(vec![n]).unwrap()
}

fn rec(n: i64) -> Record {
    let mut r = Record::new();
    r.insert("a".to_string(), Value::Int(n));
    r
}

#[test]
fn overlay_put_wins_on_collision() {
    let base = vec![(key(1), rec(1)), (key(2), rec(2))];
    let overlay = vec![(key(2), Change::Put(rec(99)))];
    let merged = merge_overlay(base, overlay);
    assert_eq!(merged, vec![(key(1), rec(1)), (key(2), rec(99))]);
}

#[test]
fn overlay_delete_suppresses_base_entry() {
    let base = vec![(key(1), rec(1)), (key(2), rec(2))];
    let overlay = vec![(key(1), Change::Delete)];
    let merged = merge_overlay(base, overlay);
    assert_eq!(merged, vec![(key(2), rec(2))]);
}

#[test]
fn overlay_insert_not_in_base_is_added_in_order() {
    let base = vec![(key(1), rec(1)), (key(3), rec(3))];
    let overlay = vec![(key(2), Change::Put(rec(2)))];
    let merged = merge_overlay(base, overlay);
    assert_eq!(merged, vec![(key(1), rec(1)), (key(2), rec(2)), (key(3), rec(3))]);
}

#[test]
fn paginate_applies_offset_then_limit() {
    let entries = vec![(key(1), rec(1)), (key(2), rec(2)), (key(3), rec(3)), (key(4), rec(4))];
    let page = paginate(entries, 1, Some(2));
    assert_eq!(page, vec![(key(2), rec(2)), (key(3), rec(3))]);
}

#[test]
fn paginate_with_no_limit_returns_remainder() {
    let entries = vec![(key(1), rec(1)), (key(2), rec(2))];
    let page = paginate(entries, 1, None);
    assert_eq!(page, vec![(key(2), rec(2))]);
}
