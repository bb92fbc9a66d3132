//! The tagged-form configuration grammar (§6): a bare keyword names a
//! simple coder, a `[tag, ...params]` array names a parameterized one.
//! Parsed from TOML since `serde` + `toml` are already ambient
//! dependencies for configuration in this codebase.

use cbordata::Cborize;
use serde::Deserialize;

use super::Lexicoder;
use crate::{err_at, Error, Result};

const CHARSET_VER: u32 = 0x00010001;

/// Character set used by the `string` lexicoder. UTF-8 is the default and,
/// at present, the only supported set; §4.1 names only a default charset,
/// leaving the parameter as a forward-compatible slot.
#[derive(Clone, Debug, PartialEq, Eq, Cborize)]
pub enum Charset {
    Utf8,
}

impl Charset {
    const ID: u32 = CHARSET_VER;
}

impl Default for Charset {
    fn default() -> Charset {
        Charset::Utf8
    }
}

impl Charset {
    pub(crate) fn encode(&self, s: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Utf8 => Ok(s.as_bytes().to_vec()),
        }
    }

    pub(crate) fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Utf8 => err_at!(InvalidArgument, String::from_utf8(bytes.to_vec())),
        }
    }

    fn parse(tag: &str) -> Result<Charset> {
        match tag {
            "utf8" | "UTF-8" | "utf-8" => Ok(Charset::Utf8),
            other => err_at!(InvalidArgument, msg: "unknown charset {:?}", other),
        }
    }
}

/// A single node of the tagged-form grammar, generic over any value a TOML
/// document can hold at that position: a bare string (simple coder or
/// parameter) or an array (parameterized coder).
#[derive(Deserialize)]
#[serde(untagged)]
enum Term {
    Tag(String),
    Form(Vec<Term>),
}

impl Lexicoder {
    /// Parse a lexicoder configuration from the tagged-form grammar encoded
    /// as a TOML value: a bare string for `bytes | string | integer |
    /// float | instant`, or an array for `[string, charset]`, `[seq,
    /// inner]`, `[tuple, t1, t2, …]`, `[reverse, inner]`.
    pub fn from_config_str(text: &str) -> Result<Lexicoder> {
        let wrapped = format!("value = {}", text);
        let table: toml::Value = err_at!(InvalidArgument, toml::from_str(&wrapped))?;
        let value = table
            .get("value")
            .ok_or_else(|| Error::InvalidArgument("missing lexicoder config".into()))?;
        let term: Term = err_at!(InvalidArgument, value.clone().try_into())?;
        Self::from_term(&term)
    }

    fn from_term(term: &Term) -> Result<Lexicoder> {
        match term {
            Term::Tag(tag) => Self::simple(tag),
            Term::Form(items) => {
                let tag = match items.first() {
                    Some(Term::Tag(tag)) => tag.as_str(),
                    _ => return err_at!(InvalidArgument, msg: "parameterized lexicoder form must start with a tag"),
                };
                match tag {
                    "string" => {
                        let charset = match items.get(1) {
                            Some(Term::Tag(tag)) => Charset::parse(tag)?,
                            None => Charset::Utf8,
                            _ => return err_at!(InvalidArgument, msg: "string charset must be a tag"),
                        };
                        Ok(Lexicoder::Str { charset })
                    }
                    "seq" => {
                        let inner = items
                            .get(1)
                            .ok_or_else(|| Error::InvalidArgument("seq requires an inner lexicoder".into()))?;
                        Ok(Lexicoder::Seq(Box::new(Self::from_term(inner)?)))
                    }
                    "tuple" => {
                        if items.len() < 2 {
                            return err_at!(InvalidArgument, msg: "tuple requires at least one element lexicoder");
                        }
                        let coders = items[1..]
                            .iter()
                            .map(Self::from_term)
                            .collect::<Result<Vec<_>>>()?;
                        Ok(Lexicoder::Tuple(coders))
                    }
                    "reverse" => {
                        let inner = items
                            .get(1)
                            .ok_or_else(|| Error::InvalidArgument("reverse requires an inner lexicoder".into()))?;
                        Ok(Lexicoder::Reverse(Box::new(Self::from_term(inner)?)))
                    }
                    other => err_at!(InvalidArgument, msg: "unknown parameterized lexicoder tag {:?}", other),
                }
            }
        }
    }

    fn simple(tag: &str) -> Result<Lexicoder> {
        match tag {
            "bytes" => Ok(Lexicoder::Bytes),
            "string" => Ok(Lexicoder::Str { charset: Charset::Utf8 }),
            "integer" => Ok(Lexicoder::Integer),
            "float" => Ok(Lexicoder::Float),
            "instant" => Ok(Lexicoder::Instant),
            other => err_at!(InvalidArgument, msg: "unknown lexicoder tag {:?}", other),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
