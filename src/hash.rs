//! Non-cryptographic hashing used by the bloom filter (§4.2): a thin
//! [`Hasher`] wrapper around Google's CityHash via the `cityhash-rs` crate.

use std::hash::{BuildHasher, Hash, Hasher};

#[derive(Clone, Copy, Default)]
pub struct CityHasher {
    digest: u128,
}

impl CityHasher {
    pub fn new() -> CityHasher {
        CityHasher::default()
    }
}

impl BuildHasher for CityHasher {
    type Hasher = Self;

    #[inline]
    fn build_hasher(&self) -> Self {
        *self
    }
}

impl Hasher for CityHasher {
    fn finish(&self) -> u64 {
        ((self.digest >> 64) as u64) ^ ((self.digest & 0xFFFF_FFFF_FFFF_FFFF) as u64)
    }

    fn write(&mut self, bytes: &[u8]) {
        self.digest = cityhash_rs::cityhash_110_128(bytes);
    }
}

/// Two independent 64-bit digests of `element`, the raw material for
/// Kirsch–Mitzenmacher double hashing (`h_i = h1 + i*h2`), which derives
/// any number of bloom-filter hash positions from a single fast
/// non-cryptographic hash instead of re-hashing per position.
pub fn digest_pair<Q: ?Sized + Hash>(element: &Q) -> (u64, u64) {
    let mut hasher = CityHasher::new();
    element.hash(&mut hasher);
    let full = hasher.digest;
    let h1 = (full >> 64) as u64;
    let h2 = (full & 0xFFFF_FFFF_FFFF_FFFF) as u64;
    // Guarantee h2 is odd so repeated addition cycles through all residues
    // modulo a power-of-two table size instead of only the even ones.
    (h1, h2 | 1)
}
