//! Escaping and separator logic shared by the `seq(T)` and `tuple(T1,T2,…)`
//! lexicoders (§4.1): each element is encoded, `0x00` bytes inside it are
//! escaped to `0x01 0x01` and `0x01` bytes to `0x01 0x02`, then elements are
//! joined with a raw, unescaped `0x00` separator.

use super::{Lexicoder, Value};
use crate::{err_at, Error, Result};

fn escape(raw: &[u8], out: &mut Vec<u8>) {
    for &b in raw {
        match b {
            0x00 => out.extend_from_slice(&[0x01, 0x01]),
            0x01 => out.extend_from_slice(&[0x01, 0x02]),
            b => out.push(b),
        }
    }
}

fn unescape(escaped: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(escaped.len());
    let mut iter = escaped.iter().copied();
    while let Some(b) = iter.next() {
        if b == 0x01 {
            match iter.next() {
                Some(0x01) => out.push(0x00),
                Some(0x02) => out.push(0x01),
                _ => return err_at!(InvalidArgument, msg: "malformed escape sequence in seq/tuple encoding"),
            }
        } else {
            out.push(b);
        }
    }
    Ok(out)
}

/// Split on raw (unescaped) `0x00` separators, returning the still-escaped
/// segment for each element.
fn split_elements(bytes: &[u8]) -> Vec<&[u8]> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == 0x00 {
            segments.push(&bytes[start..i]);
            start = i + 1;
        } else if bytes[i] == 0x01 {
            i += 1; // skip the escaped byte that follows
        }
        i += 1;
    }
    segments.push(&bytes[start..]);
    segments
}

fn encode_elements(coders: &[&Lexicoder], items: &[Value]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for (i, (coder, item)) in coders.iter().zip(items.iter()).enumerate() {
        if i > 0 {
            out.push(0x00);
        }
        let raw = coder.encode_bytes(item)?;
        escape(&raw, &mut out);
    }
    Ok(out)
}

pub fn encode(inner: &Lexicoder, items: &[Value]) -> Result<Vec<u8>> {
    let coders: Vec<&Lexicoder> = items.iter().map(|_| inner).collect();
    encode_elements(&coders, items)
}

pub fn encode_tuple(coders: &[Lexicoder], items: &[Value]) -> Result<Vec<u8>> {
    let refs: Vec<&Lexicoder> = coders.iter().collect();
    encode_elements(&refs, items)
}

pub fn decode(inner: &Lexicoder, bytes: &[u8]) -> Result<Vec<Value>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let mut values = Vec::new();
    for segment in split_elements(bytes) {
        let raw = unescape(segment)?;
        values.push(inner.decode(&raw)?);
    }
    Ok(values)
}

pub fn decode_tuple(coders: &[Lexicoder], bytes: &[u8]) -> Result<Vec<Value>> {
    let segments = if bytes.is_empty() && coders.is_empty() {
        Vec::new()
    } else {
        split_elements(bytes)
    };
    if segments.len() != coders.len() {
        return err_at!(
            InvalidArgument,
            msg: "tuple arity mismatch on decode: expected {} got {}",
            coders.len(),
            segments.len()
        );
    }
    let mut values = Vec::with_capacity(coders.len());
    for (coder, segment) in coders.iter().zip(segments.into_iter()) {
        let raw = unescape(segment)?;
        values.push(coder.decode(&raw)?);
    }
    Ok(values)
}

#[cfg(test)]
#[path = "seq_test.rs"]
mod seq_test;
