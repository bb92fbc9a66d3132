//! Record merger knobs (§4.7): how a new write combines with an existing
//! record. Exactly one of `update_record`/`update_field` may be supplied;
//! tombstones override any merger.

use crate::{err_at, family::Record, lexicoder::Value, Error, Result};

pub type RecordMerger<'a> = dyn Fn(&Record, &Record) -> Record + 'a;
pub type FieldMerger<'a> = dyn Fn(&str, Option<&Value>, &Value) -> Value + 'a;

/// Either knob from §4.7, or neither (default map-merge).
pub enum Merger<'a> {
    Record(&'a RecordMerger<'a>),
    Field(&'a FieldMerger<'a>),
    Default,
}

impl<'a> Merger<'a> {
    pub fn validate(has_record: bool, has_field: bool) -> Result<()> {
        if has_record && has_field {
            err_at!(InvalidArgument, msg: "insert options may not supply both update_record and update_field")
        } else {
            Ok(())
        }
    }

    /// Combine `old` (the record currently on disk, if any) with `new` (the
    /// incoming write). The default behavior is map-merge: the result
    /// starts from `old`'s fields and `new`'s fields are laid on top, so a
    /// field present only in `old` is retained and a field present in both
    /// is replaced. A field that is nil-valued in `new` still drops the
    /// field, since absence from the map IS the nil value (§4.7). A
    /// supplied record merger takes over entirely for records that exist
    /// on both sides; a supplied field merger still unions the field sets
    /// but lets the caller pick the combined value for fields present in
    /// both `old` and `new`.
    pub fn apply(&self, old: Option<&Record>, new: &Record) -> Record {
        match self {
            Merger::Record(merge) => match old {
                Some(old) => merge(old, new),
                None => new.clone(),
            },
            Merger::Field(merge) => {
                let mut merged = old.cloned().unwrap_or_default();
                for (field, new_value) in new.iter() {
                    let old_value = old.and_then(|old| old.get(field));
                    merged.insert(field.clone(), merge(field.as_str(), old_value, new_value));
                }
                merged
            }
            Merger::Default => {
                let mut merged = old.cloned().unwrap_or_default();
                for (field, new_value) in new.iter() {
                    merged.insert(field.clone(), new_value.clone());
                }
                merged
            }
        }
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod merge_test;
