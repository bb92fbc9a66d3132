//! The rooted recursive structure of index nodes and partitions (§3 "Data
//! tree" row). A single sum type over the two node shapes, dispatched by
//! exhaustive match rather than a type tag (§9 "protocol-based dispatch").

use std::collections::BTreeSet;

use crate::{
    family::{FieldKey, Families, Record},
    index::IndexNode,
    key::{Key, KeyRange},
    partition::Partition,
};

#[derive(Clone, Debug, PartialEq)]
pub enum DataTree {
    Partition(Partition),
    Index(IndexNode),
}

impl DataTree {
    /// Height of this node: 0 for a partition, `>=1` for an index node.
    pub fn height(&self) -> usize {
        match self {
            DataTree::Partition(_) => 0,
            DataTree::Index(node) => node.height(),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            DataTree::Partition(p) => p.count(),
            DataTree::Index(node) => node.count(),
        }
    }

    pub fn first_key(&self) -> Option<&Key> {
        match self {
            DataTree::Partition(p) => p.first_key(),
            DataTree::Index(node) => Some(node.first_key()),
        }
    }

    pub fn last_key(&self) -> Option<&Key> {
        match self {
            DataTree::Partition(p) => p.last_key(),
            DataTree::Index(node) => Some(node.last_key()),
        }
    }

    pub fn read_all(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>) -> Vec<(Key, Record)> {
        match self {
            DataTree::Partition(p) => p.read_all(families, fields),
            DataTree::Index(node) => node.read_all(families, fields),
        }
    }

    pub fn read_batch(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>, keys: &[Key]) -> Vec<(Key, Record)> {
        match self {
            DataTree::Partition(p) => p.read_batch(families, fields, keys),
            DataTree::Index(node) => node.read_batch(families, fields, keys),
        }
    }

    pub fn read_range(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>, range: &KeyRange) -> Vec<(Key, Record)> {
        match self {
            DataTree::Partition(p) => p.read_range(families, fields, range),
            DataTree::Index(node) => node.read_range(families, fields, range),
        }
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
