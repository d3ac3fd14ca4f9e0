//! Store key derivation from cache identifiers.
//!
//! The underlying store addresses records by short, filesystem-safe string
//! keys. Cache identifiers (typically request URIs) are arbitrary-length, so
//! they are one-way hashed down to a fixed-width hex digest before touching
//! the store. No reverse mapping is kept; the digest is the entry's sole
//! identity inside the store.

use std::fmt;

/// Hex digest width of a [`StoreKey`]: 128-bit MD5, two hex chars per byte.
pub const KEY_WIDTH: usize = 32;

/// Fixed-width lowercase-hex key addressing one record in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the store key for a cache identifier.
///
/// Hashes the identifier's UTF-8 bytes with MD5 and renders the digest as
/// 32 lowercase hex characters. Deterministic and pure; `md5::compute` is
/// stateless per call, so concurrent derivation needs no synchronization.
pub fn derive_key(identifier: &str) -> StoreKey {
    StoreKey(format!("{:x}", md5::compute(identifier.as_bytes())))
}
