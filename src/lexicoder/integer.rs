//! Variable-length, order-preserving two's-complement integer encoding
//! (§4.1 "integer"). A header byte encodes sign and payload length so that
//! the encoded byte string sorts the same as the numeric value: headers
//! `0x78..=0x7f` are negative (8 down to 1 payload bytes), `0x80..=0x87`
//! are non-negative (1 up to 8 payload bytes).

use crate::{err_at, Error, Result};

const POS_BASE: u8 = 0x80;
const NEG_BASE: u8 = 0x7f;

/// Minimal payload length, 1..=8, needed to hold `i` as a truncated
/// two's-complement value of that many bytes.
fn payload_len(i: i64) -> u8 {
    let v = i as i128;
    for len in 1..=8u8 {
        let pow = 1i128 << (8 * len as u32);
        let fits = if v >= 0 { v < pow } else { v >= -pow };
        if fits {
            return len;
        }
    }
    8
}

pub fn encode(i: i64) -> Vec<u8> {
    let len = payload_len(i);
    let full = i.to_be_bytes(); // 8-byte two's complement, big-endian
    let payload = &full[8 - len as usize..];

    let header = if i >= 0 {
        POS_BASE + (len - 1)
    } else {
        NEG_BASE - (len - 1)
    };

    let mut out = Vec::with_capacity(1 + len as usize);
    out.push(header);
    out.extend_from_slice(payload);
    out
}

/// Decode the integer at the start of `bytes`, returning it and the number
/// of bytes consumed (header + payload).
pub fn decode(bytes: &[u8]) -> Result<(i64, usize)> {
    let header = *bytes
        .first()
        .ok_or_else(|| Error::InvalidArgument("empty input to integer lexicoder".into()))?;

    let (negative, len) = if header >= POS_BASE {
        (false, header - POS_BASE + 1)
    } else if header <= NEG_BASE && header >= NEG_BASE.wrapping_sub(7) {
        (true, NEG_BASE - header + 1)
    } else {
        return err_at!(InvalidArgument, msg: "invalid integer lexicoder header {:#x}", header);
    };
    let len = len as usize;

    if bytes.len() < 1 + len {
        return err_at!(
            InvalidArgument,
            msg: "truncated integer payload: need {} have {}",
            len,
            bytes.len() - 1
        );
    }

    let mut full = if negative { [0xffu8; 8] } else { [0u8; 8] };
    full[8 - len..].copy_from_slice(&bytes[1..1 + len]);
    Ok((i64::from_be_bytes(full), 1 + len))
}

#[cfg(test)]
#[path = "integer_test.rs"]
mod integer_test;
