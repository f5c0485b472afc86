//! Blind-index tokens and their derivation.
//!
//! A blind index is the SHA-256 digest of a canonical form, hex-encoded
//! and prefixed with the `\x` marker the storage query layer uses for
//! hex binary literals. It is stored next to the encrypted row and
//! matched by exact value, so the backend never sees the plaintext term.

use std::collections::HashSet;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canon::{canon, Scheme};
use crate::error::Error;

/// Marker identifying the token as a hex-encoded binary literal to the
/// storage backend's query layer.
pub const MARKER: &str = "\\x";

/// Total token length: 2-char marker + 64 hex chars of a 256-bit digest.
pub const TOKEN_LEN: usize = 66;

/// Below this many terms a parallel derive costs more than it saves.
const PAR_THRESHOLD: usize = 32;

// =============================================================================
// BlindIndex
// =============================================================================

/// A derived blind index: `\x` followed by 64 lowercase hex characters.
///
/// Construction goes through [`Deriver::derive`] or [`BlindIndex::parse`],
/// so a value of this type is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlindIndex(String);

impl BlindIndex {
    /// Validate an externally supplied token (e.g. one a client pre-built
    /// and sent in a request body).
    pub fn parse(s: &str) -> Result<Self, Error> {
        let invalid = |reason| Error::InvalidToken {
            token: s.to_string(),
            reason,
        };
        let hex = s.strip_prefix(MARKER).ok_or_else(|| invalid("missing \\x marker"))?;
        if hex.len() != TOKEN_LEN - MARKER.len() {
            return Err(invalid("digest is not 64 hex characters"));
        }
        if !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(invalid("digest contains non-hex or uppercase characters"));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlindIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Deriver
// =============================================================================

/// Derives blind indexes under a fixed index scheme.
///
/// Pure and stateless apart from the scheme tag; callers construct one
/// per scheme rather than reaching for a global.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deriver {
    scheme: Scheme,
}

impl Deriver {
    pub fn new(scheme: Scheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Canonicalize a raw term and hash it into a blind index.
    ///
    /// Deterministic: the same term (or any term with the same canonical
    /// form) always yields the same token.
    pub fn derive(&self, term: &str) -> BlindIndex {
        let canonical = canon(self.scheme, term);
        let digest = Sha256::digest(canonical.as_bytes());
        BlindIndex(format!("{}{}", MARKER, hex::encode(digest)))
    }

    /// Derive a deduplicated list of blind indexes from raw terms.
    ///
    /// Duplicates (terms whose canonical forms collide) are dropped,
    /// first occurrence wins, and output order follows input order.
    /// Large inputs derive in parallel; the dedup pass runs over the
    /// original order regardless of completion order.
    pub fn derive_list<S: AsRef<str> + Sync>(&self, terms: &[S]) -> Vec<BlindIndex> {
        let derived: Vec<BlindIndex> = if terms.len() >= PAR_THRESHOLD {
            terms.par_iter().map(|t| self.derive(t.as_ref())).collect()
        } else {
            terms.iter().map(|t| self.derive(t.as_ref())).collect()
        };

        let mut seen = HashSet::with_capacity(derived.len());
        derived
            .into_iter()
            .filter(|bi| seen.insert(bi.clone()))
            .collect()
    }
}

/// Extract a term list from a JSON array, rejecting non-string elements.
///
/// The offending element's index and JSON type are reported instead of
/// coercing it to text.
pub fn terms_from_json(value: &serde_json::Value) -> Result<Vec<String>, Error> {
    let items = value.as_array().ok_or(Error::NonStringTerm {
        index: 0,
        found: json_type(value),
    })?;
    let mut terms = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            serde_json::Value::String(s) => terms.push(s.clone()),
            other => {
                return Err(Error::NonStringTerm {
                    index,
                    found: json_type(other),
                })
            }
        }
    }
    Ok(terms)
}

fn json_type(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// =============================================================================
// Helper functions for hex encoding
// =============================================================================

mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut hex = String::with_capacity(bytes.len() * 2);
        for &b in bytes {
            hex.push(HEX_CHARS[(b >> 4) as usize] as char);
            hex.push(HEX_CHARS[(b & 0x0f) as usize] as char);
        }
        hex
    }
}
