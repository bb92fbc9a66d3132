//! Order-preserving binary64 encoding (§4.1 "float"). Negative values have
//! every bit inverted; non-negative values have only the sign bit flipped.
//! This is the standard IEEE-754-to-unsigned-order trick: it makes an
//! unsigned big-endian comparison of the transformed bits agree with
//! floating-point order, including across the negative/non-negative split.

use crate::{err_at, Error, Result};

const SIGN_BIT: u64 = 1 << 63;

pub fn encode(f: f64) -> Result<Vec<u8>> {
    if f.is_nan() {
        return err_at!(InvalidArgument, msg: "float lexicoder rejects NaN");
    }
    let bits = f.to_bits();
    let mapped = if f.is_sign_negative() {
        !bits
    } else {
        bits | SIGN_BIT
    };
    Ok(mapped.to_be_bytes().to_vec())
}

pub fn decode(bytes: &[u8]) -> Result<f64> {
    if bytes.len() < 8 {
        return err_at!(
            InvalidArgument,
            msg: "truncated float payload: need 8 have {}",
            bytes.len()
        );
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    let mapped = u64::from_be_bytes(buf);
    let bits = if mapped & SIGN_BIT == 0 {
        !mapped
    } else {
        mapped ^ SIGN_BIT
    };
    Ok(f64::from_bits(bits))
}

#[cfg(test)]
#[path = "float_test.rs"]
mod float_test;
