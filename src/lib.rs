//! A data-tree engine for MerkleDB tables: a B+-tree-variant index over
//! sorted record partitions, a patch buffer that amortizes writes, and a
//! batched update algorithm that rewrites the tree with O(log n) work per
//! touched key.
//!
//! Every value at rest is content-addressed by an external block store;
//! this crate owns only the in-memory shapes (`DataTree`, `Partition`,
//! `IndexNode`, `Patch`) and the algorithms over them (`update::apply_batch`,
//! the read-path dispatch on `DataTree`). The block store, the reference
//! tracker, the wire codec, the database-level root, and connection/lock
//! management are external collaborators; see [`store::BlockStore`] and
//! [`store::RefTracker`] for the interfaces this crate assumes of them.
//!
//! A [`Table`](table::Table) ties a [`TableConfig`](table::TableConfig) to
//! a `(committed_root, pending_state)` pair and exposes the read/write/flush
//! surface an application actually calls.

mod bloom;
mod error;
mod family;
mod hash;
mod index;
mod iter;
mod key;
mod merge;
mod partition;
mod patch;
mod store;
mod table;
mod tablet;
mod tree;
mod update;
mod util;

pub mod lexicoder;

pub use crate::bloom::FixedBloom;
pub use crate::error::{Error, Result};
pub use crate::family::{Change, FieldKey, Families, Record, RecordValue, BASE_FAMILY};
pub use crate::index::IndexNode;
pub use crate::iter::{merge_overlay, paginate};
pub use crate::key::{Key, KeyRange};
pub use crate::merge::{FieldMerger, Merger, RecordMerger};
pub use crate::partition::Partition;
pub use crate::patch::Patch;
pub use crate::store::{BlockStore, Link, NodePayload, RefTracker, RefValue};
pub use crate::table::{FlushOpts, ReadOpts, Table, TableConfig};
pub use crate::tree::DataTree;
pub use crate::update::{apply_batch, UpdateContext};

#[cfg(test)]
#[path = "table_scenarios_test.rs"]
mod table_scenarios_test;
