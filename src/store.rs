//! The external collaborators this crate assumes but does not implement
//! (§1, §6): a content-addressed block store and a reference tracker. Both
//! are traits here so a caller can supply any backing implementation; this
//! crate only defines the wire-shape of what it hands them, via
//! [`NodePayload`].

use cbordata::Cborize;

use crate::{family::FieldKey, key::Key, lexicoder::Lexicoder, Result};

const LINK_VER: u32 = 0x00010001;
const NODE_PAYLOAD_VER: u32 = 0x00010001;

/// One outgoing link from a persisted node to a child block (§6: "each link
/// is `(name, target-hash, recursive-size)`").
#[derive(Clone, Debug, PartialEq, Cborize)]
pub struct Link<H> {
    pub name: String,
    pub target: H,
    pub recursive_size: u64,
}

impl<H> Link<H> {
    const ID: u32 = LINK_VER;
}

/// Content-addressed put/get by hash (§6 "Block store (dependency)"). `Hash`
/// is left abstract (multihash, a raw digest, whatever the backing store
/// uses to name a block), since this crate never inspects a hash, only
/// threads it through.
pub trait BlockStore {
    type Hash: Clone + Eq + Ord;

    fn put(&self, payload: &NodePayload<Self::Hash>) -> Result<Self::Hash>;
    fn get(&self, hash: &Self::Hash) -> Result<Option<NodePayload<Self::Hash>>>;
}

/// A named, versioned pointer to a hash, with compare-and-set semantics on
/// update (§6 "Reference tracker (dependency)").
#[derive(Clone, Debug, PartialEq)]
pub struct RefValue<H> {
    pub value_hash: H,
    pub version: u64,
    pub time: u64,
}

pub trait RefTracker {
    type Hash: Clone + Eq;

    fn list_refs(&self) -> Result<Vec<String>>;
    fn get_ref(&self, name: &str) -> Result<Option<RefValue<Self::Hash>>>;
    fn get_history(&self, name: &str) -> Result<Vec<RefValue<Self::Hash>>>;
    /// Atomically point `name` at `hash`, returning the new version.
    fn set_ref(&self, name: &str, hash: Self::Hash) -> Result<u64>;
}

/// The closed set of node type-tags persisted to the block store (§6 "Node
/// type tags"), carrying exactly the fields each tag lists. Generic over
/// the store's hash type so a caller's `BlockStore::Hash` flows straight
/// through without this crate picking one.
#[derive(Clone, Debug, PartialEq, Cborize)]
pub enum NodePayload<H> {
    Table {
        fanout: usize,
        partition_limit: usize,
        patch_limit: usize,
        record_count: usize,
        families: Vec<(String, Vec<FieldKey>)>,
        key_lexicoder: Lexicoder,
        primary_key: FieldKey,
        data_link: Option<Link<H>>,
        patch_link: Option<Link<H>>,
    },
    Index {
        height: usize,
        separator_keys: Vec<Key>,
        children_links: Vec<Link<H>>,
        count: usize,
        first_key: Key,
        last_key: Key,
    },
    Partition {
        count: usize,
        families: Vec<String>,
        first_key: Option<Key>,
        last_key: Option<Key>,
        membership_filter: Vec<u8>,
        tablets: Vec<(String, Link<H>)>,
        limit: usize,
    },
    Tablet {
        records: Vec<(Key, Vec<(FieldKey, crate::lexicoder::Value)>)>,
    },
    /// `None` in the change slot is the tombstone marker (§6): "a sentinel
    /// value distinct from any user map".
    Patch {
        changes: Vec<(Key, Option<Vec<(FieldKey, crate::lexicoder::Value)>>)>,
    },
}

impl<H> NodePayload<H> {
    const ID: u32 = NODE_PAYLOAD_VER;
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
