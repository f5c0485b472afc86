//! Error taxonomy.
//!
//! Canonicalization and derivation are total functions and cannot fail;
//! errors only arise at the edges, when externally supplied tokens,
//! scheme tags, or JSON term lists fail validation. All failures
//! propagate immediately to the caller; there is no local recovery.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A pre-built token did not look like `\x` + 64 lowercase hex chars.
    #[error("invalid blind-index token '{token}': {reason}")]
    InvalidToken { token: String, reason: &'static str },

    /// A JSON terms array held something other than a string. The element
    /// is reported, never coerced.
    #[error("terms[{index}] is not a string (found {found})")]
    NonStringTerm { index: usize, found: &'static str },

    /// Unrecognized index-scheme tag.
    #[error("unknown index scheme '{0}' (expected 'v1' or 'v2')")]
    UnknownScheme(String),
}
