//! Order-preserving byte encoders for common value types and composites
//! (§4.1). A [`Lexicoder`] is a closed configuration tree; [`Value`] is the
//! closed set of things a lexicoder can encode. Both are plain sum types,
//! an enumerated configuration schema plus a factory rather than a
//! keyword-dispatched registry (§9).

mod config;
mod float;
mod integer;
mod seq;

pub use config::Charset;

use cbordata::Cborize;

use std::cmp::Ordering;

use crate::{err_at, key::Key, Error, Result};

const VALUE_VER: u32 = 0x00010001;
const LEXICODER_VER: u32 = 0x00010001;

/// A value a [`Lexicoder`] can encode or decode.
#[derive(Clone, Debug, PartialEq, Cborize)]
pub enum Value {
    Bytes(Vec<u8>),
    Str(String),
    Int(i64),
    Float(f64),
    /// Epoch-milliseconds.
    Instant(i64),
    Seq(Vec<Value>),
    Tuple(Vec<Value>),
}

impl Value {
    const ID: u32 = VALUE_VER;
}

/// A parsed, order-preserving encoder configuration (§4.1, §6 grammar).
#[derive(Clone, Debug, PartialEq, Cborize)]
pub enum Lexicoder {
    Bytes,
    Str { charset: Charset },
    Integer,
    Float,
    Instant,
    Seq(Box<Lexicoder>),
    Tuple(Vec<Lexicoder>),
    Reverse(Box<Lexicoder>),
}

impl Lexicoder {
    const ID: u32 = LEXICODER_VER;
}

impl Lexicoder {
    /// Encode `value` into a [`Key`], rejecting inputs that do not match
    /// this coder's shape (invalid-argument, §7).
    pub fn encode(&self, value: &Value) -> Result<Key> {
        let bytes = self.encode_bytes(value)?;
        Key::new(bytes)
    }

    fn encode_bytes(&self, value: &Value) -> Result<Vec<u8>> {
        match (self, value) {
            (Lexicoder::Bytes, Value::Bytes(b)) => {
                if b.is_empty() {
                    err_at!(InvalidArgument, msg: "bytes lexicoder rejects empty input")
                } else {
                    Ok(b.clone())
                }
            }
            (Lexicoder::Str { charset }, Value::Str(s)) => {
                if s.is_empty() {
                    err_at!(InvalidArgument, msg: "string lexicoder rejects empty input")
                } else {
                    charset.encode(s)
                }
            }
            (Lexicoder::Integer, Value::Int(i)) => Ok(integer::encode(*i)),
            (Lexicoder::Instant, Value::Instant(ms)) => Ok(integer::encode(*ms)),
            (Lexicoder::Float, Value::Float(f)) => float::encode(*f),
            (Lexicoder::Seq(inner), Value::Seq(items)) => seq::encode(inner, items),
            (Lexicoder::Tuple(coders), Value::Tuple(items)) => {
                if coders.len() != items.len() {
                    return err_at!(
                        InvalidArgument,
                        msg: "tuple arity mismatch: expected {} got {}",
                        coders.len(),
                        items.len()
                    );
                }
                seq::encode_tuple(coders, items)
            }
            (Lexicoder::Reverse(inner), value) => {
                let mut bytes = inner.encode_bytes(value)?;
                for b in bytes.iter_mut() {
                    *b = 255 - *b;
                }
                Ok(bytes)
            }
            (coder, value) => err_at!(
                InvalidArgument,
                msg: "lexicoder {:?} cannot encode value {:?}",
                coder,
                value
            ),
        }
    }

    /// Reverse of [`Lexicoder::encode`]: recover the original value from its
    /// encoded bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let (value, rest) = self.decode_bytes(bytes)?;
        if !rest.is_empty() {
            return err_at!(
                InvalidArgument,
                msg: "{} trailing bytes after decode",
                rest.len()
            );
        }
        Ok(value)
    }

    /// Decode a value and return the bytes that followed it. Composite
    /// coders (seq/tuple) need this to consume one element at a time.
    fn decode_bytes<'b>(&self, bytes: &'b [u8]) -> Result<(Value, &'b [u8])> {
        match self {
            Lexicoder::Bytes => Ok((Value::Bytes(bytes.to_vec()), &bytes[bytes.len()..])),
            Lexicoder::Str { charset } => {
                let s = charset.decode(bytes)?;
                Ok((Value::Str(s), &bytes[bytes.len()..]))
            }
            Lexicoder::Integer => {
                let (i, n) = integer::decode(bytes)?;
                Ok((Value::Int(i), &bytes[n..]))
            }
            Lexicoder::Instant => {
                let (i, n) = integer::decode(bytes)?;
                Ok((Value::Instant(i), &bytes[n..]))
            }
            Lexicoder::Float => {
                let f = float::decode(bytes)?;
                Ok((Value::Float(f), &bytes[bytes.len()..]))
            }
            Lexicoder::Seq(inner) => {
                let items = seq::decode(inner, bytes)?;
                Ok((Value::Seq(items), &bytes[bytes.len()..]))
            }
            Lexicoder::Tuple(coders) => {
                let items = seq::decode_tuple(coders, bytes)?;
                Ok((Value::Tuple(items), &bytes[bytes.len()..]))
            }
            Lexicoder::Reverse(inner) => {
                let unreversed: Vec<u8> = bytes.iter().map(|b| 255 - b).collect();
                let (value, _) = inner.decode_bytes(&unreversed)?;
                Ok((value, &bytes[bytes.len()..]))
            }
        }
    }

    /// Compare two already-encoded keys the way this coder's values order.
    /// For every lexicoder this is exactly byte-lexicographic comparison of
    /// the encoded form (§8 order-preservation property), so this is mostly
    /// a documentation aid and testing hook rather than a distinct
    /// algorithm.
    pub fn compare_encoded(a: &Key, b: &Key) -> Ordering {
        a.cmp(b)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
