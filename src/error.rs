//! The error taxonomy the core reports to callers, and the `err_at!` macro
//! used throughout this crate to attach a source location to every error.

use std::{fmt, result};

/// Errors surfaced by the data-tree engine.
///
/// All errors are final; the engine performs no retries (§7). Reads never
/// mutate state; writes are staged in memory until the new root is written,
/// so every error observed by a caller leaves persisted state unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller passed the wrong shape: bad lexicoder config, empty bytes
    /// where not allowed, tuple arity mismatch, both mergers supplied.
    InvalidArgument(String),
    /// Tablet/partition overlap, split outside range, unsupported node
    /// type encountered in traversal.
    InvariantViolation(String),
    /// A child link could not be resolved in the block store. Fatal when
    /// encountered on a write path (§7).
    MissingNode(String),
    /// Database or table name already exists at creation; rename target
    /// already exists.
    NameConflict(String),
    /// Updating or dropping a table that does not exist.
    NoSuchTable(String),
    /// A root node was produced whose structure fails its invariants.
    SpecViolation(String),
    /// A numeric or size conversion failed (e.g. a length did not fit a
    /// target integer type).
    FailConvert(String),
    /// Anything else that should never happen.
    Fatal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidArgument(s) => write!(f, "invalid-argument: {}", s),
            Error::InvariantViolation(s) => write!(f, "invariant-violation: {}", s),
            Error::MissingNode(s) => write!(f, "missing-node: {}", s),
            Error::NameConflict(s) => write!(f, "name-conflict: {}", s),
            Error::NoSuchTable(s) => write!(f, "no-such-table: {}", s),
            Error::SpecViolation(s) => write!(f, "spec-violation: {}", s),
            Error::FailConvert(s) => write!(f, "fail-convert: {}", s),
            Error::Fatal(s) => write!(f, "fatal: {}", s),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

/// Build an `Error` of the named variant, either from a format string, or
/// by wrapping a foreign `Result`'s `Err` with a `file:line` prefix.
///
/// ```ignore
/// err_at!(InvalidArgument, msg: "empty key at {}", pos)?;
/// err_at!(FailConvert, usize::try_from(n))?;
/// ```
#[macro_export]
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+ $(,)?) => {{
        Err($crate::Error::$v(format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => Err($crate::Error::$v(format!(
                "{}:{} {}",
                file!(),
                line!(),
                err
            ))),
        }
    }};
}
