//! Blind-index derivation for searchable encryption.
//!
//! Turns free-text search terms into deterministic, irreversible lookup
//! tokens that can sit next to field-encrypted rows and be matched by
//! exact value, without the storage backend ever seeing the plaintext.
//!
//! Three operations make up the whole contract:
//!
//! - [`canon`] — canonicalize a raw term (NFKC, lowercase, accent fold,
//!   whitespace collapse)
//! - [`Deriver::derive`] — hash one canonical form into a [`BlindIndex`]
//!   (`\x` + 64 hex chars of a SHA-256 digest)
//! - [`Deriver::derive_list`] — map many terms to a deduplicated,
//!   order-preserving token list for any-of-N queries
//!
//! All three are pure: no I/O, no randomness, no shared state. The
//! accent-folding behavior is versioned via [`Scheme`] because changing
//! it changes every stored index for affected terms.
//!
//! ```
//! use blindex::{Deriver, Scheme};
//!
//! let deriver = Deriver::new(Scheme::V1);
//! let tokens = deriver.derive_list(&["Torta", "torta", "cheesecake"]);
//! assert_eq!(tokens.len(), 2);
//! assert!(tokens[0].as_str().starts_with("\\x"));
//! ```

pub mod canon;
pub mod error;
pub mod token;

pub use canon::{canon, Scheme};
pub use error::Error;
pub use token::{terms_from_json, BlindIndex, Deriver, MARKER, TOKEN_LEN};
