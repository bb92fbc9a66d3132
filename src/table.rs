//! The table engine: coordinates reads and writes across the patch buffer
//! and the data tree, flushing the patch when it outgrows its limit
//! (§4.9). A `Table` value is a `(committed_root, pending_state)` pair
//! (§9 "Immutable values with a dirty bit"); every mutating method returns
//! a new value sharing structure with the old one.

use log::{debug, info};

use std::collections::BTreeSet;

use crate::{
    err_at,
    family::{FieldKey, Families, Record},
    iter,
    key::{Key, KeyRange},
    lexicoder::{Lexicoder, Value},
    merge::Merger,
    patch::Patch,
    tree::DataTree,
    update::{self, UpdateContext},
    Error, Result,
};

/// Table-level configuration (§3 Table root row): fan-out, limits, the
/// primary-key field and its lexicoder, and the family layout. Stable
/// across a table's lifetime.
#[derive(Clone, Debug)]
pub struct TableConfig {
    pub fanout: usize,
    pub partition_limit: usize,
    pub patch_limit: usize,
    pub primary_key: FieldKey,
    pub key_lexicoder: Lexicoder,
    pub families: Families,
    pub target_fp: f64,
}

impl TableConfig {
    pub fn new(primary_key: impl Into<FieldKey>, key_lexicoder: Lexicoder, families: Families) -> Result<TableConfig> {
        TableConfig::with_limits(primary_key, key_lexicoder, families, 32, 1000, 1000)
    }

    /// `fanout` must be `>= 4` (§3: `b >= 4`).
    pub fn with_limits(
        primary_key: impl Into<FieldKey>,
        key_lexicoder: Lexicoder,
        families: Families,
        fanout: usize,
        partition_limit: usize,
        patch_limit: usize,
    ) -> Result<TableConfig> {
        if fanout < 4 {
            return err_at!(InvalidArgument, msg: "fan-out must be >= 4, got {}", fanout);
        }
        Ok(TableConfig {
            fanout,
            partition_limit,
            patch_limit,
            primary_key: primary_key.into(),
            key_lexicoder,
            families,
            target_fp: 0.01,
        })
    }

    fn key_of(&self, record: &Record) -> Result<Key> {
        let value = record.get(&self.primary_key).ok_or_else(|| {
            Error::InvalidArgument(format!("record missing primary key field {:?}", self.primary_key))
        })?;
        self.key_lexicoder.encode(value)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReadOpts {
    pub fields: Option<BTreeSet<FieldKey>>,
    pub min_key: Option<Key>,
    pub max_key: Option<Key>,
    pub offset: usize,
    pub limit: Option<usize>,
    /// Documented not-yet-implemented (§9 Open Questions): every read API
    /// rejects `reverse: true` with `Error::InvalidArgument`.
    pub reverse: bool,
}

impl ReadOpts {
    fn range(&self) -> KeyRange {
        KeyRange::new(self.min_key.clone(), self.max_key.clone())
    }

    fn check_reverse(&self) -> Result<()> {
        if self.reverse {
            err_at!(InvalidArgument, msg: "reverse scans are not implemented")
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct FlushOpts {
    pub apply_patch: bool,
}

/// The committed root plus the in-memory pending overlay (§3 Table root,
/// §9 "pair (committed_root, pending_state)").
#[derive(Clone)]
pub struct Table {
    config: TableConfig,
    data_tree: Option<DataTree>,
    /// The last-flushed, persisted patch tablet.
    patch_tablet: Patch,
    /// Writes accepted since the last flush; not yet merged with
    /// `patch_tablet` or committed into a new patch tablet.
    pending: Patch,
    record_count: usize,
}

impl Table {
    pub fn new(config: TableConfig) -> Table {
        Table { config, data_tree: None, patch_tablet: Patch::new(), pending: Patch::new(), record_count: 0 }
    }

    pub fn dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub(crate) fn data_tree(&self) -> Option<&DataTree> {
        self.data_tree.as_ref()
    }

    /// Buffer `records` into `pending` (§4.8: "updates go into pending; the
    /// engine does NOT fetch the whole record from the tree to merge until
    /// the patch flushes"). A later write to the same key simply replaces
    /// the earlier pending entry.
    pub fn insert(&self, records: Vec<Record>) -> Result<Table> {
        let mut pending = self.pending.clone();
        for record in records {
            let key = self.config.key_of(&record)?;
            pending.put(key, record);
        }
        Ok(Table { pending, ..self.clone() })
    }

    pub fn delete(&self, keys: Vec<Key>) -> Table {
        let mut pending = self.pending.clone();
        for key in keys {
            pending.delete(key);
        }
        Table { pending, ..self.clone() }
    }

    fn overlay(&self) -> Patch {
        self.pending.union(&self.patch_tablet)
    }

    /// Resolve a single key through the overlay, falling back to the tree
    /// (§4.8 "read of specific keys").
    pub fn read(&self, keys: &[Key], opts: &ReadOpts) -> Result<Vec<(Key, Record)>> {
        opts.check_reverse()?;
        let overlay = self.overlay();
        let mut found = Vec::new();
        let mut tree_lookup = Vec::new();
        for key in keys {
            match overlay.resolve(key) {
                Some(Some(record)) => {
                    if let Some(projected) = project(record, &opts.fields) {
                        found.push((key.clone(), projected));
                    }
                }
                Some(None) => {}
                None => tree_lookup.push(key.clone()),
            }
        }
        if let Some(tree) = &self.data_tree {
            if !tree_lookup.is_empty() {
                found.extend(tree.read_batch(&self.config.families, opts.fields.as_ref(), &tree_lookup));
            }
        }
        found.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(iter::paginate(found, opts.offset, opts.limit))
    }

    /// Full range scan: merge the (filtered) patch overlay with the
    /// (filtered) tree stream, overlay winning on collisions and
    /// tombstones suppressing tree entries (§4.8 "on range scan").
    pub fn scan(&self, opts: &ReadOpts) -> Result<Vec<(Key, Record)>> {
        opts.check_reverse()?;
        let range = opts.range();
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let tree_entries = match &self.data_tree {
            Some(tree) => tree.read_range(&self.config.families, opts.fields.as_ref(), &range),
            None => Vec::new(),
        };
        let merged = self.overlay().overlay_range(&range, tree_entries);
        let projected: Vec<(Key, Record)> = merged
            .into_iter()
            .filter_map(|(k, r)| project(&r, &opts.fields).map(|r| (k, r)))
            .collect();
        Ok(iter::paginate(projected, opts.offset, opts.limit))
    }

    pub fn keys(&self, opts: &ReadOpts) -> Result<Vec<Key>> {
        Ok(self.scan(opts)?.into_iter().map(|(k, _)| k).collect())
    }

    pub fn list_partitions(&self) -> Vec<&DataTree> {
        fn collect<'a>(node: &'a DataTree, out: &mut Vec<&'a DataTree>) {
            match node {
                DataTree::Partition(_) => out.push(node),
                DataTree::Index(index) => {
                    for child in index.children() {
                        collect(child, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        if let Some(tree) = &self.data_tree {
            collect(tree, &mut out);
        }
        out
    }

    pub fn read_partition(&self, partition: &DataTree, fields: Option<&BTreeSet<FieldKey>>) -> Vec<(Key, Record)> {
        partition.read_all(&self.config.families, fields)
    }

    /// The flush state machine (§4.9). Returns `self` unchanged (no new
    /// node written) when the table isn't dirty.
    pub fn flush(&self, opts: FlushOpts, merger: &Merger) -> Result<Table> {
        if !self.dirty() {
            return Ok(self.clone());
        }

        let changes = self.overlay();
        if changes.is_empty() {
            let mut table = self.clone();
            table.patch_tablet = Patch::new();
            table.pending = Patch::new();
            return Ok(table);
        }

        if changes.len() > self.config.patch_limit || opts.apply_patch {
            debug!(target: "table ", "flush: applying {} changes into the data tree (patch-limit {})", changes.len(), self.config.patch_limit);
            let ctx = UpdateContext {
                fanout: self.config.fanout,
                partition_limit: self.config.partition_limit,
                target_fp: self.config.target_fp,
                families: &self.config.families,
                merger,
            };
            let data_tree = update::apply_batch(self.data_tree.as_ref(), changes.entries(), &ctx)?;
            let record_count = data_tree.as_ref().map_or(0, DataTree::count);
            info!(target: "table ", "flush: new root height {:?}, {} records", data_tree.as_ref().map(DataTree::height), record_count);
            Ok(Table { config: self.config.clone(), data_tree, patch_tablet: Patch::new(), pending: Patch::new(), record_count })
        } else {
            debug!(target: "table ", "flush: {} changes written as a new patch tablet", changes.len());
            Ok(Table {
                config: self.config.clone(),
                data_tree: self.data_tree.clone(),
                patch_tablet: changes,
                pending: Patch::new(),
                record_count: self.record_count,
            })
        }
    }
}

/// Apply the requested field projection, dropping the record entirely when
/// none of its fields match (a field-scoped read should not surface keys
/// that carry nothing it asked for).
fn project(record: &Record, fields: &Option<BTreeSet<FieldKey>>) -> Option<Record> {
    match fields {
        Some(fields) => {
            let projected = Families::project(record, fields);
            if projected.is_empty() {
                None
            } else {
                Some(projected)
            }
        }
        None => Some(record.clone()),
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
