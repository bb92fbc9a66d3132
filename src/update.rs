//! The batch update algorithm (§4.6/§4.6a): rewrites a data tree with
//! O(log_b n) visited nodes per touched partition, splitting overflowing
//! paths and merging underflowing ones in a single pass that may mix
//! inserts and deletes.

use std::collections::BTreeMap;

use crate::{
    err_at,
    family::{Change, Families, Record},
    index::IndexNode,
    key::Key,
    merge::Merger,
    partition::Partition,
    tree::DataTree,
    util, Result,
};

pub struct UpdateContext<'a> {
    pub fanout: usize,
    pub partition_limit: usize,
    pub target_fp: f64,
    pub families: &'a Families,
    pub merger: &'a Merger<'a>,
}

/// What a recursive step hands back to its caller (§4.6 "Output of the
/// function"): either a bare run of records awaiting promotion into a
/// partition (the `-1` sentinel height), or a list of sibling nodes all at
/// one height.
enum Carry {
    Records(Vec<(Key, Record)>),
    Nodes(usize, Vec<DataTree>),
}

/// Apply `changes` to `tree` (the current data-tree root, or `None` for an
/// empty tree) and return the new root.
pub fn apply_batch(tree: Option<&DataTree>, changes: Vec<(Key, Change)>, ctx: &UpdateContext) -> Result<Option<DataTree>> {
    let carry = match tree {
        None => {
            let records = puts_only(changes, ctx);
            if records.is_empty() {
                None
            } else {
                Some(Carry::Records(records))
            }
        }
        Some(root) => update_node(root, changes, None, ctx)?,
    };
    promote(carry, ctx)
}

// A delete against a nonexistent record is a no-op; a put against a
// nonexistent record still runs the configured merger with `old = None`
// (§4.7).
fn puts_only(changes: Vec<(Key, Change)>, ctx: &UpdateContext) -> Vec<(Key, Record)> {
    changes
        .into_iter()
        .filter_map(|(key, change)| match change {
            Change::Put(record) => Some((key, ctx.merger.apply(None, &record))),
            Change::Delete => None,
        })
        .collect()
}

/// §4.6 step 6: turn the final carry into a root node, building index
/// layers bottom-up until a single node remains.
fn promote(carry: Option<Carry>, ctx: &UpdateContext) -> Result<Option<DataTree>> {
    match carry {
        None => Ok(None),
        Some(Carry::Records(records)) => {
            let groups = if records.len() > ctx.partition_limit {
                util::stream_split(records, ctx.partition_limit)
            } else {
                vec![records]
            };
            let mut nodes = Vec::with_capacity(groups.len());
            for group in groups {
                nodes.push(DataTree::Partition(Partition::from_records(ctx.families, ctx.partition_limit, ctx.target_fp, group)?));
            }
            promote_nodes(nodes, ctx)
        }
        Some(Carry::Nodes(_, nodes)) => promote_nodes(nodes, ctx),
    }
}

fn promote_nodes(mut nodes: Vec<DataTree>, ctx: &UpdateContext) -> Result<Option<DataTree>> {
    if nodes.is_empty() {
        return Ok(None);
    }
    while nodes.len() > 1 {
        if nodes.len() <= ctx.fanout {
            return Ok(Some(DataTree::Index(IndexNode::new(nodes)?)));
        }
        let groups = util::group_into_valid_sizes(nodes, ctx.fanout);
        let mut next = Vec::with_capacity(groups.len());
        for group in groups {
            next.push(DataTree::Index(IndexNode::new(group)?));
        }
        nodes = next;
    }
    Ok(nodes.into_iter().next())
}

fn update_node(node: &DataTree, changes: Vec<(Key, Change)>, carry: Option<Carry>, ctx: &UpdateContext) -> Result<Option<Carry>> {
    match node {
        DataTree::Partition(partition) => {
            let carry_records = match carry {
                None => Vec::new(),
                Some(Carry::Records(records)) => records,
                Some(Carry::Nodes(..)) => {
                    return err_at!(InvariantViolation, msg: "a partition cannot absorb a node-shaped carry")
                }
            };
            update_partition(partition, changes, carry_records, ctx)
        }
        DataTree::Index(index) => update_index(index, changes, carry, ctx),
    }
}

fn update_index(index: &IndexNode, changes: Vec<(Key, Change)>, carry: Option<Carry>, ctx: &UpdateContext) -> Result<Option<Carry>> {
    let children = index.children();
    let child_height = children[0].height();

    // Step 1: divide changes by child using the separator keys.
    let mut by_child: Vec<Vec<(Key, Change)>> = vec![Vec::new(); children.len()];
    for (key, change) in changes {
        let idx = index.separators().partition_point(|sep| sep <= &key);
        by_child[idx].push((key, change));
    }

    // Step 2: adopt a carry that already matches this node's child height
    // by splicing its nodes in as extra children with empty change
    // slices; a shorter carry is handed to the first child instead.
    let mut extra_front: Vec<DataTree> = Vec::new();
    let mut carry_for_first_child: Option<Carry> = None;
    match carry {
        None => {}
        Some(Carry::Nodes(h, nodes)) if h == child_height => extra_front = nodes,
        other => carry_for_first_child = other,
    }

    let mut output: Vec<DataTree> = Vec::new();
    let mut pending_carry: Option<Carry> = None;

    for node in extra_front {
        output.push(node);
    }

    // Step 3: recurse child-by-child in key order. A child with no change
    // slice and no carry to absorb is untouched: reuse it as-is instead of
    // visiting its subtree (§4.6 "never rewrite untouched subtrees").
    for (i, child) in children.iter().enumerate() {
        let slice_changes = std::mem::take(&mut by_child[i]);
        let carry_in = if i == 0 { carry_for_first_child.take() } else { pending_carry.take() };

        if slice_changes.is_empty() && carry_in.is_none() {
            output.push(child.clone());
            continue;
        }

        let result = update_node(child, slice_changes, carry_in, ctx)?;
        match result {
            None => {}
            Some(Carry::Nodes(h, mut nodes)) if h == child_height => output.append(&mut nodes),
            Some(other) => pending_carry = Some(other),
        }
    }

    // Step 4: carry-back any unabsorbed carry into the last output child.
    while let Some(carry) = pending_carry.take() {
        let last = match output.pop() {
            Some(last) => last,
            None => {
                // No sibling left to absorb into: the carry becomes this
                // node's own output.
                return Ok(Some(carry));
            }
        };
        let result = update_node(&last, Vec::new(), Some(carry), ctx)?;
        match result {
            None => {}
            Some(Carry::Nodes(h, mut nodes)) if h == child_height => output.append(&mut nodes),
            Some(other) => pending_carry = Some(other),
        }
    }

    // Step 5: rebuild valid index nodes at this height from the
    // accumulated children. A single surviving child, or too few to form
    // a half-full index node, is handed up unwrapped as a shorter carry
    // at `child_height` rather than padded into a node of this height.
    if output.is_empty() {
        return Ok(None);
    }
    let half = util::ceil_div(ctx.fanout, 2);
    if output.len() < half {
        return Ok(Some(Carry::Nodes(child_height, output)));
    }

    let groups = util::group_into_valid_sizes(output, ctx.fanout);
    let mut nodes = Vec::with_capacity(groups.len());
    for group in groups {
        nodes.push(DataTree::Index(IndexNode::new(group)?));
    }
    Ok(Some(Carry::Nodes(index.height(), nodes)))
}

/// §4.6a: given a partition, its assigned change slice, and a possible
/// bare-record carry from an earlier sibling, load, mutate, and rebuild.
fn update_partition(partition: &Partition, changes: Vec<(Key, Change)>, carry_records: Vec<(Key, Record)>, ctx: &UpdateContext) -> Result<Option<Carry>> {
    if changes.is_empty() && carry_records.is_empty() {
        return Ok(Some(Carry::Nodes(0, vec![DataTree::Partition(partition.clone())])));
    }

    let mut records: BTreeMap<Key, Record> = partition.read_all(ctx.families, None).into_iter().collect();

    for (key, change) in changes {
        match change {
            Change::Delete => {
                records.remove(&key);
            }
            Change::Put(new_record) => {
                let old = records.get(&key);
                let merged = ctx.merger.apply(old, &new_record);
                records.insert(key, merged);
            }
        }
    }
    for (key, record) in carry_records {
        records.insert(key, record);
    }

    let records: Vec<(Key, Record)> = records.into_iter().collect();
    let total = records.len();

    if total == 0 {
        return Ok(None);
    }

    let half = util::ceil_div(ctx.partition_limit, 2);

    if total <= ctx.partition_limit {
        if total < half {
            return Ok(Some(Carry::Records(records)));
        }
        let rebuilt = Partition::from_records(ctx.families, ctx.partition_limit, ctx.target_fp, records)?;
        return Ok(Some(Carry::Nodes(0, vec![DataTree::Partition(rebuilt)])));
    }

    let groups = util::stream_split(records, ctx.partition_limit);
    let mut nodes = Vec::with_capacity(groups.len());
    for group in groups {
        nodes.push(DataTree::Partition(Partition::from_records(ctx.families, ctx.partition_limit, ctx.target_fp, group)?));
    }
    Ok(Some(Carry::Nodes(0, nodes)))
}

#[cfg(test)]
#[path = "update_test.rs"]
mod update_test;
