//! Internal B+-style tree node: sorted separator keys, child links, and
//! aggregate count/first-key/last-key over the subtree (§3 Index node row,
//! §4.5 tree read algorithms).

use std::collections::BTreeSet;

use crate::{
    err_at,
    family::{FieldKey, Families, Record},
    key::{Key, KeyRange},
    tree::DataTree,
    Error, Result,
};

#[derive(Clone, Debug, PartialEq)]
pub struct IndexNode {
    height: usize,
    separators: Vec<Key>,
    children: Vec<DataTree>,
    count: usize,
    first_key: Key,
    last_key: Key,
}

impl IndexNode {
    /// Build an index node over `children`, which must all share the same
    /// height (all partitions, or all index nodes one level below this
    /// one). Separator keys are each child's first key, except the first
    /// child (§3: `k0 = -infinity`, implicit).
    pub fn new(children: Vec<DataTree>) -> Result<IndexNode> {
        if children.len() < 2 {
            return err_at!(
                InvariantViolation,
                msg: "index node needs at least 2 children, got {}",
                children.len()
            );
        }
        let child_height = DataTree::height(&children[0]);
        for child in &children[1..] {
            if DataTree::height(child) != child_height {
                return err_at!(InvariantViolation, msg: "index node children span mixed heights");
            }
        }

        let mut separators = Vec::with_capacity(children.len() - 1);
        let mut count = 0usize;
        for child in &children[1..] {
            separators.push(
                child
                    .first_key()
                    .cloned()
                    .ok_or_else(|| Error::InvariantViolation("empty child in index node".to_string()))?,
            );
        }
        for child in &children {
            count += child.count();
        }
        let first_key = children[0]
            .first_key()
            .cloned()
            .ok_or_else(|| Error::InvariantViolation("empty first child in index node".to_string()))?;
        let last_key = children[children.len() - 1]
            .last_key()
            .cloned()
            .ok_or_else(|| Error::InvariantViolation("empty last child in index node".to_string()))?;

        Ok(IndexNode { height: child_height + 1, separators, children, count, first_key, last_key })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn first_key(&self) -> &Key {
        &self.first_key
    }

    pub fn last_key(&self) -> &Key {
        &self.last_key
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> &[DataTree] {
        &self.children
    }

    pub fn separators(&self) -> &[Key] {
        &self.separators
    }

    fn child_index_for(&self, key: &Key) -> usize {
        // Number of separators <= key is the index of the child owning it.
        self.separators.partition_point(|sep| sep <= key)
    }

    /// Lower/upper bound of child `i`'s key range, from the surrounding
    /// separators. `None` stands for -infinity / +infinity.
    fn child_bounds(&self, i: usize) -> (Option<&Key>, Option<&Key>) {
        let leading = if i == 0 { None } else { Some(&self.separators[i - 1]) };
        let trailing = self.separators.get(i);
        (leading, trailing)
    }

    pub fn read_all(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>) -> Vec<(Key, Record)> {
        let mut out = Vec::new();
        for child in &self.children {
            out.extend(child.read_all(families, fields));
        }
        out
    }

    /// Assign keys to children by binary-searching the separator vector;
    /// recurse only into children with a non-empty assignment (§4.5).
    pub fn read_batch(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>, keys: &[Key]) -> Vec<(Key, Record)> {
        let mut by_child: Vec<Vec<Key>> = vec![Vec::new(); self.children.len()];
        for key in keys {
            by_child[self.child_index_for(key)].push(key.clone());
        }
        let mut out = Vec::new();
        for (i, child) in self.children.iter().enumerate() {
            if !by_child[i].is_empty() {
                out.extend(child.read_batch(families, fields, &by_child[i]));
            }
        }
        out
    }

    /// Include child `i` iff its leading bound is at or below `range.max`
    /// and its trailing bound is at or above `range.min` (§4.5).
    pub fn read_range(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>, range: &KeyRange) -> Vec<(Key, Record)> {
        if range.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        for (i, child) in self.children.iter().enumerate() {
            let (leading, trailing) = self.child_bounds(i);
            let below_max = leading.map_or(true, |k| range.max.as_ref().map_or(true, |max| k <= max));
            let above_min = trailing.map_or(true, |k| range.min.as_ref().map_or(true, |min| k >= min));
            if below_max && above_min {
                out.extend(child.read_range(families, fields, range));
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
