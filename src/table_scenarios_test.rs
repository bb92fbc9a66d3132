//! End-to-end scenarios exercising the table engine against the kind of
//! mixed insert/delete workload a caller would actually run: build a tree,
//! delete enough to force underflow, insert enough to force overflow, and
//! verify the patch buffer defers tree rewrites until it should not.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    family::Record, key::Key, lexicoder::Value, Families, FlushOpts, Lexicoder, Merger, ReadOpts,
    Table, TableConfig,
};

const KEYS: [i64; 19] = [4, 5, 6, 7, 8, 10, 11, 12, 13, 14, 17, 18, 21, 23, 24, 25, 30, 31, 32];

fn families() -> Families {
    let mut spec = BTreeMap::new();
    spec.insert("bc".to_string(), BTreeSet::from(["b".to_string(), "c".to_string()]));
    Families::new(spec).unwrap()
}

fn config() -> TableConfig {
    TableConfig::with_limits("id", Lexicoder::Integer, families(), 4, 5, 10).unwrap()
}

fn record_for(k: i64) -> Record {
    let mut r = Record::new();
    r.insert("id".to_string(), Value::Int(k));
    r.insert("a".to_string(), Value::Int(k));
    if k % 3 == 0 {
        r.insert("b".to_string(), Value::Int(100 - k));
    }
    if k % 5 == 0 {
        r.insert("c".to_string(), Value::Int(20 + k));
    }
    r
}

fn key_of(k: i64) -> Key {
    Lexicoder::Integer.encode(&Value::Int(k)).unwrap()
}

fn records(keys: &[i64]) -> Vec<Record> {
    keys.iter().map(|&k| record_for(k)).collect()
}

/// Every non-root partition holds `[ceil(p/2), p]` records and every
/// non-root index node has `[ceil(b/2), b]` children (§8 quantified
/// invariant).
fn check_bounds(tree: &crate::DataTree, fanout: usize, limit: usize) {
    fn walk(node: &crate::DataTree, fanout: usize, limit: usize, is_root: bool) {
        match node {
            crate::DataTree::Partition(p) => {
                if !is_root {
                    let half = crate::util::ceil_div(limit, 2);
                    assert!(p.count() >= half && p.count() <= limit);
                }
            }
            crate::DataTree::Index(index) => {
                let children = index.children();
                if !is_root {
                    let half = crate::util::ceil_div(fanout, 2);
                    assert!(children.len() >= half, "index has {} children", children.len());
                }
                for child in children {
                    walk(child, fanout, limit, false);
                }
            }
        }
    }
    walk(tree, fanout, limit, true);
}

fn build_and_flush() -> Table {
    let table = Table::new(config());
    let table = table.insert(records(&KEYS)).unwrap();
    let merger = Merger::Default;
    table.flush(FlushOpts { apply_patch: true }, &merger).unwrap()
}

#[test]
fn scenario_build_and_scan() {
    let table = build_and_flush();
    assert!(!table.dirty());
    assert_eq!(table.record_count(), KEYS.len());

    let tree = table_data_tree(&table);
    check_bounds(tree, 4, 5);

    let mut fields = BTreeSet::new();
    fields.insert("c".to_string());
    let opts = ReadOpts { fields: Some(fields), ..Default::default() };
    let out = table.scan(&opts).unwrap();
    let got: Vec<i64> = out
        .iter()
        .map(|(_, r)| match r.get("c") {
            Some(Value::Int(c)) => *c,
            _ => panic!("expected only the c field"),
        })
        .collect();
    assert_eq!(got, vec![25, 30, 45, 50]);
}

#[test]
fn scenario_deletion_carry_up() {
    let table = build_and_flush();
    let to_delete: Vec<Key> = [7, 8, 10, 11].iter().map(|&k| key_of(k)).collect();
    let table = table.delete(to_delete);
    let merger = Merger::Default;
    let table = table.flush(FlushOpts { apply_patch: true }, &merger).unwrap();

    assert_eq!(table.record_count(), 15);
    let out = table.scan(&ReadOpts::default()).unwrap();
    let remaining: Vec<i64> = out
        .iter()
        .map(|(_, r)| match r.get("a") {
            Some(Value::Int(a)) => *a,
            _ => panic!("expected a field"),
        })
        .collect();
    let expected: Vec<i64> = KEYS.iter().cloned().filter(|k| ![7, 8, 10, 11].contains(k)).collect();
    assert_eq!(remaining, expected);
}

#[test]
fn scenario_underflow_merge() {
    let table = build_and_flush();
    let table = table.delete(vec![key_of(6)]);
    let merger = Merger::Default;
    let table = table.flush(FlushOpts { apply_patch: true }, &merger).unwrap();

    assert_eq!(table.record_count(), 18);
    let tree = table_data_tree(&table);
    check_bounds(tree, 4, 5);

    let out = table.scan(&ReadOpts::default()).unwrap();
    let remaining: Vec<i64> = out
        .iter()
        .map(|(_, r)| match r.get("a") {
            Some(Value::Int(a)) => *a,
            _ => panic!("expected a field"),
        })
        .collect();
    let expected: Vec<i64> = KEYS.iter().cloned().filter(|&k| k != 6).collect();
    assert_eq!(remaining, expected);
}

#[test]
fn scenario_overflow_split() {
    let table = build_and_flush();
    let extra = [0, 1, 2, 3, 9, 15, 16];
    let table = table.insert(records(&extra)).unwrap();
    let merger = Merger::Default;
    let table = table.flush(FlushOpts { apply_patch: true }, &merger).unwrap();

    assert_eq!(table.record_count(), 26);
    let tree = table_data_tree(&table);
    check_bounds(tree, 4, 5);

    let out = table.scan(&ReadOpts::default()).unwrap();
    let mut all_keys: Vec<i64> = KEYS.to_vec();
    all_keys.extend(extra);
    all_keys.sort_unstable();
    let remaining: Vec<i64> = out
        .iter()
        .map(|(_, r)| match r.get("a") {
            Some(Value::Int(a)) => *a,
            _ => panic!("expected a field"),
        })
        .collect();
    assert_eq!(remaining, all_keys);
}

#[test]
fn scenario_patch_only_update_is_visible_without_a_tree_rewrite() {
    let table = build_and_flush();
    let tree_before = table_data_tree(&table).clone();

    let mut overwritten = Record::new();
    overwritten.insert("id".to_string(), Value::Int(5));
    overwritten.insert("a".to_string(), Value::Int(999));
    let table = table.insert(vec![overwritten]).unwrap();
    assert!(table.dirty());

    let out = table.read(&[key_of(5)], &ReadOpts::default()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].1.get("a"), Some(&Value::Int(999)));

    let merger = Merger::Default;
    let flushed = table.flush(FlushOpts { apply_patch: false }, &merger).unwrap();
    assert_eq!(table_data_tree(&flushed).clone(), tree_before);
}

#[test]
fn scenario_tombstone_suppression_then_collapse() {
    let table = build_and_flush();

    let mut overwritten = Record::new();
    overwritten.insert("id".to_string(), Value::Int(5));
    overwritten.insert("a".to_string(), Value::Int(999));
    let table = table.insert(vec![overwritten]).unwrap();
    let table = table.delete(vec![key_of(5)]);

    let merger = Merger::Default;
    let patched = table.clone().flush(FlushOpts { apply_patch: false }, &merger).unwrap();
    let out = patched.scan(&ReadOpts::default()).unwrap();
    assert!(!out.iter().any(|(k, _)| *k == key_of(5)));
    assert_eq!(patched.record_count(), KEYS.len());

    let collapsed = table.flush(FlushOpts { apply_patch: true }, &merger).unwrap();
    assert_eq!(collapsed.record_count(), KEYS.len() - 1);
    let out = collapsed.scan(&ReadOpts::default()).unwrap();
    assert!(!out.iter().any(|(k, _)| *k == key_of(5)));
}

fn table_data_tree(table: &Table) -> &crate::DataTree {
    table.data_tree().expect("table should have a built data tree")
}
