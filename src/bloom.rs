//! Fixed-size probabilistic membership filter used as a partition's
//! membership filter (§4.2). `insert` is monotonic; `contains` never
//! false-negatives; two filters with matching `bits`/`k` merge by bitwise
//! OR.

use std::hash::Hash;

use crate::{err_at, hash, Error, Result};

/// A bloom filter over a `2^bits`-length bit array with `k` hash positions
/// per element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedBloom {
    bits: u8,
    k: u8,
    table: Vec<u8>, // bit-packed, len == ceil(2^bits / 8)
}

impl FixedBloom {
    /// `bits` sizes the table to `2^bits` slots; `k` is the number of hash
    /// positions probed per element. Larger `k` lowers the false-positive
    /// rate at a fixed table size, at the cost of more probes.
    pub fn new(bits: u8, k: u8) -> Result<FixedBloom> {
        if bits == 0 || bits > 32 {
            return err_at!(InvalidArgument, msg: "bloom filter bits must be in 1..=32, got {}", bits);
        }
        if k == 0 {
            return err_at!(InvalidArgument, msg: "bloom filter k must be >= 1");
        }
        let slots = 1u64 << bits;
        let table_len = ((slots + 7) / 8) as usize;
        Ok(FixedBloom { bits, k, table: vec![0u8; table_len] })
    }

    /// Build a filter sized for `capacity` elements at roughly `target_fp`
    /// false-positive rate (default 1% per §4.2), using the standard
    /// bloom-filter sizing formulas `m = -n ln(p) / (ln 2)^2`,
    /// `k = (m/n) ln 2`.
    pub fn for_capacity(capacity: usize, target_fp: f64) -> Result<FixedBloom> {
        let capacity = capacity.max(1) as f64;
        let target_fp = if target_fp > 0.0 && target_fp < 1.0 { target_fp } else { 0.01 };

        let ln2 = std::f64::consts::LN_2;
        let m = (-capacity * target_fp.ln() / (ln2 * ln2)).ceil().max(8.0);
        let bits = (m.log2().ceil() as u8).max(1).min(32);
        let k = (((1u64 << bits) as f64 / capacity) * ln2).round().max(1.0).min(16.0) as u8;
        FixedBloom::new(bits, k)
    }

    fn slots(&self) -> u64 {
        1u64 << self.bits
    }

    fn positions<Q: ?Sized + Hash>(&self, element: &Q) -> Vec<u64> {
        let (h1, h2) = hash::digest_pair(element);
        let n = self.slots();
        (0..self.k as u64).map(|i| h1.wrapping_add(i.wrapping_mul(h2)) % n).collect()
    }

    fn set_bit(&mut self, pos: u64) {
        let (byte, bit) = ((pos / 8) as usize, (pos % 8) as u32);
        self.table[byte] |= 1 << bit;
    }

    fn get_bit(&self, pos: u64) -> bool {
        let (byte, bit) = ((pos / 8) as usize, (pos % 8) as u32);
        self.table[byte] & (1 << bit) != 0
    }

    /// Add `element` to the set. Monotonic: never clears a bit.
    pub fn insert<Q: ?Sized + Hash>(&mut self, element: &Q) {
        for pos in self.positions(element) {
            self.set_bit(pos);
        }
    }

    /// True for every element previously inserted; true with bounded
    /// probability for non-members.
    pub fn contains<Q: ?Sized + Hash>(&self, element: &Q) -> bool {
        self.positions(element).into_iter().all(|pos| self.get_bit(pos))
    }

    /// Bitwise-OR two filters built with matching `bits`/`k`.
    pub fn or(&self, other: &FixedBloom) -> Result<FixedBloom> {
        if self.bits != other.bits || self.k != other.k {
            return err_at!(
                InvariantViolation,
                msg: "cannot merge bloom filters with mismatched bits/k ({},{}) vs ({},{})",
                self.bits, self.k, other.bits, other.k
            );
        }
        let table = self.table.iter().zip(other.table.iter()).map(|(a, b)| a | b).collect();
        Ok(FixedBloom { bits: self.bits, k: self.k, table })
    }

    /// Serialize as the `(k, bits, bin-bytes)` triple (§4.2).
    pub fn to_triple(&self) -> (u8, u8, Vec<u8>) {
        (self.k, self.bits, self.table.clone())
    }

    pub fn from_triple(k: u8, bits: u8, table: Vec<u8>) -> Result<FixedBloom> {
        let mut filter = FixedBloom::new(bits, k)?;
        if table.len() != filter.table.len() {
            return err_at!(
                InvalidArgument,
                msg: "bloom table length {} does not match bits={} (expected {})",
                table.len(), bits, filter.table.len()
            );
        }
        filter.table = table;
        Ok(filter)
    }
}

#[cfg(test)]
#[path = "bloom_test.rs"]
mod bloom_test;
