//! Leaf of the tree: partition metadata plus a base tablet and optional
//! per-family tablets (§4.4). Every record key lives in the base tablet;
//! non-base tablet keys are a subset of the base keys.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    bloom::FixedBloom,
    family::{FieldKey, Families, Record},
    key::{Key, KeyRange},
    tablet::Tablet,
    Result,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    base: Tablet,
    tablets: BTreeMap<String, Tablet>,
    filter: FixedBloom,
    limit: usize,
}

fn grouped(records: impl IntoIterator<Item = (Key, Record)>) -> Vec<(Key, Record)> {
    let map: BTreeMap<Key, Record> = records.into_iter().collect();
    map.into_iter().collect()
}

impl Partition {
    /// Group `records` by family (base gets every key with the residual
    /// map; non-base tablets hold only that family's fields, dropping keys
    /// with an empty residual), write each tablet, and build the
    /// membership filter over every key (§4.4 `from-records`).
    pub fn from_records(
        families: &Families,
        limit: usize,
        target_fp: f64,
        records: Vec<(Key, Record)>,
    ) -> Result<Partition> {
        let records = grouped(records);

        let mut base_entries = Vec::with_capacity(records.len());
        let mut by_family: BTreeMap<String, Vec<(Key, Record)>> = BTreeMap::new();
        for (key, record) in &records {
            let (base_residual, fam_map) = families.split(record);
            base_entries.push((key.clone(), base_residual));
            for (fam, rec) in fam_map {
                by_family.entry(fam).or_default().push((key.clone(), rec));
            }
        }

        let base = Tablet::from_sorted(base_entries)?;

        let mut tablets = BTreeMap::new();
        for (fam, entries) in by_family {
            if let Some(tablet) = Tablet::from_sorted(entries)?.prune() {
                tablets.insert(fam, tablet);
            }
        }

        let filter = Self::build_filter(records.iter().map(|(k, _)| k), records.len(), target_fp)?;

        Ok(Partition { base, tablets, filter, limit })
    }

    fn build_filter<'a>(
        keys: impl Iterator<Item = &'a Key>,
        count: usize,
        target_fp: f64,
    ) -> Result<FixedBloom> {
        let mut filter = FixedBloom::for_capacity(count, target_fp)?;
        for key in keys {
            filter.insert(key.as_bytes());
        }
        Ok(filter)
    }

    pub fn count(&self) -> usize {
        self.base.len()
    }

    pub fn first_key(&self) -> Option<&Key> {
        self.base.first_key()
    }

    pub fn last_key(&self) -> Option<&Key> {
        self.base.last_key()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn membership(&self) -> &FixedBloom {
        &self.filter
    }

    /// Tablets that must be loaded to satisfy `fields` (`None` = every
    /// field): `base` is included unless the requested fields are entirely
    /// covered by non-base families (§4.4 `read-all`).
    fn families_to_load(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>) -> (bool, BTreeSet<String>) {
        match fields {
            None => (true, families.family_names().map(String::from).collect()),
            Some(fields) => families.families_covering(fields),
        }
    }

    fn merged<F>(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>, selector: F) -> Vec<(Key, Record)>
    where
        F: Fn(&Tablet) -> Vec<(Key, Record)>,
    {
        let (needs_base, needed) = self.families_to_load(families, fields);
        let mut merged: BTreeMap<Key, Record> = BTreeMap::new();
        if needs_base {
            for (key, record) in selector(&self.base) {
                merged.entry(key).or_default().extend(record);
            }
        }
        for fam in &needed {
            if let Some(tablet) = self.tablets.get(fam) {
                for (key, record) in selector(tablet) {
                    merged.entry(key).or_default().extend(record);
                }
            }
        }
        let entries: Vec<(Key, Record)> = merged.into_iter().collect();
        match fields {
            // A key with none of the requested fields carries nothing worth
            // returning, so drop it rather than emit an empty map.
            Some(fields) => entries
                .into_iter()
                .map(|(k, r)| (k, Families::project(&r, fields)))
                .filter(|(_, r)| !r.is_empty())
                .collect(),
            None => entries,
        }
    }

    pub fn read_all(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>) -> Vec<(Key, Record)> {
        self.merged(families, fields, |t| t.read_all().to_vec())
    }

    /// Consult the membership filter to short-circuit definite misses
    /// before reading the chosen tablets (§4.4 `read-batch`).
    pub fn read_batch(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>, keys: &[Key]) -> Vec<(Key, Record)> {
        let present: Vec<Key> = keys.iter().filter(|k| self.filter.contains(k.as_bytes())).cloned().collect();
        self.merged(families, fields, |t| t.read_batch(&present))
    }

    pub fn read_range(&self, families: &Families, fields: Option<&BTreeSet<FieldKey>>, range: &KeyRange) -> Vec<(Key, Record)> {
        self.merged(families, fields, |t| t.read_range(range))
    }

    /// Apply `additions` (full replacement records) and `deletions`,
    /// writing a new tablet per affected family; `base` always receives
    /// every added key, possibly with an empty residual (§4.4 `update`).
    /// Returns `None` if the partition becomes empty.
    pub fn update(
        &self,
        families: &Families,
        target_fp: f64,
        additions: &[(Key, Record)],
        deletions: &[Key],
    ) -> Result<Option<Partition>> {
        let mut base_adds = Vec::with_capacity(additions.len());
        let mut family_adds: BTreeMap<String, Vec<(Key, Record)>> = BTreeMap::new();
        for (key, record) in additions {
            let (base_residual, fam_map) = families.split(record);
            base_adds.push((key.clone(), base_residual));
            for (fam, rec) in fam_map {
                family_adds.entry(fam).or_default().push((key.clone(), rec));
            }
        }

        // Clear any stale per-family fields for updated keys: an addition
        // replaces a record whole, so a family not named in `family_adds`
        // for a given key must lose its prior entry there too.
        let mut clears = deletions.to_vec();
        clears.extend(additions.iter().map(|(k, _)| k.clone()));

        let base = match self.base.update(&base_adds, deletions) {
            Some(base) => base,
            None => return Ok(None),
        };

        let mut touched: BTreeSet<String> = self.tablets.keys().cloned().collect();
        touched.extend(family_adds.keys().cloned());

        let mut tablets = BTreeMap::new();
        for fam in touched {
            let adds = family_adds.get(&fam).cloned().unwrap_or_default();
            let updated = match self.tablets.get(&fam) {
                Some(tablet) => tablet.update(&adds, &clears),
                None if adds.is_empty() => None,
                None => Tablet::from_sorted(adds)?.prune(),
            };
            if let Some(tablet) = updated.and_then(|t| t.prune()) {
                tablets.insert(fam, tablet);
            }
        }

        let filter = Self::build_filter(base.read_all().iter().map(|(k, _)| k), base.len(), target_fp)?;

        Ok(Some(Partition { base, tablets, filter, limit: self.limit }))
    }

    /// Divide each tablet at `split_key`: all keys `< split_key` go left
    /// (§4.4 `split`). Each side re-derives its metadata from its own base
    /// tablet.
    pub fn split(&self, split_key: &Key, target_fp: f64) -> Result<(Partition, Partition)> {
        let (base_left, base_right) = self.base.split_at(split_key);

        let mut left_tablets = BTreeMap::new();
        let mut right_tablets = BTreeMap::new();
        for (fam, tablet) in &self.tablets {
            let (l, r) = tablet.split_at(split_key);
            if let Some(l) = l.prune() {
                left_tablets.insert(fam.clone(), l);
            }
            if let Some(r) = r.prune() {
                right_tablets.insert(fam.clone(), r);
            }
        }

        let left_filter = Self::build_filter(base_left.read_all().iter().map(|(k, _)| k), base_left.len(), target_fp)?;
        let right_filter = Self::build_filter(base_right.read_all().iter().map(|(k, _)| k), base_right.len(), target_fp)?;

        Ok((
            Partition { base: base_left, tablets: left_tablets, filter: left_filter, limit: self.limit },
            Partition { base: base_right, tablets: right_tablets, filter: right_filter, limit: self.limit },
        ))
    }
}

#[cfg(test)]
#[path = "partition_test.rs"]
mod partition_test;
