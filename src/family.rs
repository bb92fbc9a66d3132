//! Field families (§3 "Family spec" row): a named partition of a record's
//! fields, stored together in one tablet per partition. `base` is the
//! implicit family that always holds every record key, even when its
//! residual field-map is empty.

use std::collections::{BTreeMap, BTreeSet};

use crate::{err_at, lexicoder::Value, Error, Result};

pub type FieldKey = String;
/// A field value is one of the lexicoder's value types (§3 Data Model
/// supplement: records are untyped maps, but their values must come from
/// a closed set for the engine to reason about them at all).
pub type RecordValue = Value;
/// A record is a map from field-key to value; fields map to "absent" are
/// simply not present in the map (§3).
pub type Record = BTreeMap<FieldKey, RecordValue>;

pub const BASE_FAMILY: &str = "base";

/// A record-or-tombstone, as buffered in the patch and threaded through the
/// batch update algorithm (§4.6, §4.8).
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    Put(Record),
    Delete,
}

/// The table-level family layout: which fields belong to which non-base
/// family. Field sets must be disjoint across families and must not use
/// the reserved name `base`.
#[derive(Clone, Debug, Default)]
pub struct Families {
    // family name -> its field set
    families: BTreeMap<String, BTreeSet<FieldKey>>,
    // reverse index: field -> owning family, built once at construction
    field_owner: BTreeMap<FieldKey, String>,
}

impl Families {
    pub fn new(spec: BTreeMap<String, BTreeSet<FieldKey>>) -> Result<Families> {
        let mut field_owner = BTreeMap::new();
        for (family, fields) in spec.iter() {
            if family == BASE_FAMILY {
                return err_at!(InvalidArgument, msg: "family name {:?} is reserved", BASE_FAMILY);
            }
            for field in fields {
                if let Some(prev) = field_owner.insert(field.clone(), family.clone()) {
                    return err_at!(
                        InvalidArgument,
                        msg: "field {:?} claimed by both family {:?} and {:?}",
                        field, prev, family
                    );
                }
            }
        }
        Ok(Families { families: spec, field_owner })
    }

    pub fn family_names(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(|s| s.as_str())
    }

    pub fn fields_of(&self, family: &str) -> Option<&BTreeSet<FieldKey>> {
        self.families.get(family)
    }

    /// The non-base family owning `field`, or `None` if it belongs to
    /// `base` (every field not claimed by a named family).
    pub fn owner_of(&self, field: &str) -> Option<&str> {
        self.field_owner.get(field).map(|s| s.as_str())
    }

    /// Split a record's fields by family, for `Partition::from_records`
    /// (§4.4): returns `(base_residual, family -> projected_fields)`.
    /// `base_residual` holds every field not claimed by a named family.
    pub fn split(&self, record: &Record) -> (Record, BTreeMap<String, Record>) {
        let mut base_residual = Record::new();
        let mut by_family: BTreeMap<String, Record> = BTreeMap::new();
        for (field, value) in record.iter() {
            match self.owner_of(field) {
                Some(family) => {
                    by_family.entry(family.to_string()).or_default().insert(field.clone(), value.clone());
                }
                None => {
                    base_residual.insert(field.clone(), value.clone());
                }
            }
        }
        (base_residual, by_family)
    }

    /// Given a requested field set, the minimal set of family names whose
    /// tablets must be loaded, and whether `base` is needed (§4.4
    /// `read-all`: "base is included unless the selected fields are
    /// entirely covered by non-base families").
    pub fn families_covering(&self, fields: &BTreeSet<FieldKey>) -> (bool, BTreeSet<String>) {
        let mut needed = BTreeSet::new();
        let mut needs_base = false;
        for field in fields {
            match self.owner_of(field) {
                Some(family) => {
                    needed.insert(family.to_string());
                }
                None => needs_base = true,
            }
        }
        (needs_base, needed)
    }

    pub fn project(record: &Record, fields: &BTreeSet<FieldKey>) -> Record {
        record.iter().filter(|(k, _)| fields.contains(*k)).map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

#[cfg(test)]
#[path = "family_test.rs"]
mod family_test;
