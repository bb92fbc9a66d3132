//! Keys: opaque, immutable byte sequences with the total order §4.1
//! requires, compared byte-by-byte unsigned, with the shorter of two
//! strings sharing a prefix ranking first.

use cbordata::Cborize;

use std::{cmp::Ordering, fmt};

use crate::{err_at, Error, Result};

const KEY_VER: u32 = 0x00010001;

/// An immutable, order-comparable byte sequence produced by a [`Lexicoder`].
///
/// [`Lexicoder`]: crate::lexicoder::Lexicoder
#[derive(Clone, PartialEq, Eq, Hash, Cborize)]
pub struct Key {
    bytes: Vec<u8>,
}

impl Key {
    const ID: u32 = KEY_VER;
}

impl Key {
    /// Wrap raw, already-encoded bytes as a key. Rejects empty input, since
    /// every lexicoder in §4.1 rejects empty encodings for its base types.
    pub fn new(bytes: Vec<u8>) -> Result<Key> {
        if bytes.is_empty() {
            err_at!(InvalidArgument, msg: "key bytes must not be empty")
        } else {
            Ok(Key { bytes })
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Key) -> Ordering {
        // Byte-by-byte unsigned comparison; a shared-prefix tie ranks the
        // shorter sequence first. `[u8]`'s lexicographic Ord already does
        // exactly this because u8 compares unsigned.
        self.bytes.cmp(&other.bytes)
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Key) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Key({})", hex(&self.bytes))
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// An inclusive/open bound used by range-read APIs (§4.3, §4.5, §6). `None`
/// means open on that side.
#[derive(Clone, Debug)]
pub struct KeyRange {
    pub min: Option<Key>,
    pub max: Option<Key>,
}

impl KeyRange {
    pub fn all() -> KeyRange {
        KeyRange { min: None, max: None }
    }

    pub fn new(min: Option<Key>, max: Option<Key>) -> KeyRange {
        KeyRange { min, max }
    }

    /// True when the range is inverted (`min > max`), which §8 requires to
    /// yield the empty set rather than erroring.
    pub fn is_empty(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => min > max,
            _ => false,
        }
    }

    pub fn contains(&self, key: &Key) -> bool {
        if self.is_empty() {
            return false;
        }
        let above_min = self.min.as_ref().map_or(true, |m| key >= m);
        let below_max = self.max.as_ref().map_or(true, |m| key <= m);
        above_min && below_max
    }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;
